pub mod transit_map;
