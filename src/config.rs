use serde::{Deserialize, Serialize};

/// Configuración del núcleo de la app.
/// Los valores por defecto se pueden sobreescribir en tiempo de compilación
/// vía variables de entorno (ver `from_env`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Nombre por defecto de la ruta creada al iniciar sin rutas guardadas
    pub default_route_name: String,
    /// Capacidad de la cola de eventos one-shot
    pub event_queue_capacity: usize,
    pub geocode: GeocodeConfig,
    pub export: ExportConfig,
}

/// Contexto geográfico por defecto para enriquecer direcciones incompletas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeConfig {
    pub default_city: String,
    pub default_state: String,
    pub default_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub share_file_name: String,
    pub print_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_route_name: "Rota de hoje".to_string(),
            event_queue_capacity: 16,
            geocode: GeocodeConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            default_city: "São Paulo".to_string(),
            default_state: "SP".to_string(),
            default_country: "Brasil".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            share_file_name: "rota_compartilhada.txt".to_string(),
            print_file_name: "rota_impressao.txt".to_string(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self {
            default_route_name: option_env!("DEFAULT_ROUTE_NAME")
                .unwrap_or("Rota de hoje").to_string(),
            event_queue_capacity: option_env!("EVENT_QUEUE_CAPACITY")
                .unwrap_or("16").parse().unwrap_or(16),
            geocode: GeocodeConfig {
                default_city: option_env!("GEOCODE_DEFAULT_CITY")
                    .unwrap_or("São Paulo").to_string(),
                default_state: option_env!("GEOCODE_DEFAULT_STATE")
                    .unwrap_or("SP").to_string(),
                default_country: option_env!("GEOCODE_DEFAULT_COUNTRY")
                    .unwrap_or("Brasil").to_string(),
            },
            export: ExportConfig {
                share_file_name: option_env!("EXPORT_SHARE_FILE_NAME")
                    .unwrap_or("rota_compartilhada.txt").to_string(),
                print_file_name: option_env!("EXPORT_PRINT_FILE_NAME")
                    .unwrap_or("rota_impressao.txt").to_string(),
            },
        }
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
