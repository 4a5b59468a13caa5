pub mod classifier;
pub mod forest;
pub mod layers;
pub mod network;
pub mod prediction;
