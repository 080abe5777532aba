pub mod cluster_registry;
