pub mod import;
pub mod parada;
pub mod rota;

pub use import::ImportedStop;
pub use parada::{Parada, StatusParada};
pub use rota::Rota;
