pub mod export_service;
pub mod geocoding;
pub mod import_service;
pub mod manual_input_service;
pub mod optimization_service;

pub use export_service::{ExportError, ExportService, NoProvider, ShareUriProvider};
pub use geocoding::{coordenadas_validas, Geocoder, NullGeocoder};
pub use import_service::{CellValue, CsvSheetSource, ImportError, ImportService, SheetSource};
pub use manual_input_service::{normalizar_endereco, ManualInputService, ParsedParada};
pub use optimization_service::optimize_nearest_neighbor;
