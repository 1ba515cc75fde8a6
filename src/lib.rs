// ============================================================================
// ROTA RÁPIDA - NÚCLEO COMPARTIDO DE GESTIÓN DE RUTAS (RUST PURO)
// ============================================================================
// Arquitectura MVVM estricta:
// - ViewModels: estado de la sesión de ruta + lógica de negocio
// - Services: geocodificación, importación de planillas, optimización,
//   exportación (SIN acceso directo a la UI)
// - State: snapshot observable + eventos one-shot
// - Storage/Repository: persistencia de rutas como blob JSON
// - Models: estructuras compartidas con las pantallas
//
// Las pantallas, el mapa, el scanner QR y la navegación viven en la capa de
// plataforma y consumen este crate.
// ============================================================================

pub mod config;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
pub mod storage;
pub mod viewmodels;

pub use config::{AppConfig, CONFIG};
pub use models::{ImportedStop, Parada, Rota, StatusParada};
pub use repository::RouteRepository;
pub use services::{
    CsvSheetSource, ExportService, Geocoder, ImportService, ManualInputService, NullGeocoder,
    SheetSource,
};
pub use state::{ReactiveState, RouteUiEvent, RouteUiState};
pub use storage::{FileStore, KeyValueStore, LocalDataSource, MemoryStore, StorageError};
pub use viewmodels::RouteViewModel;
