use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::parada::{Parada, StatusParada};

/// Ruta de entrega: colección ORDENADA de paradas con nombre propio.
/// El orden de `paradas` es la secuencia de entrega; nunca se reordena
/// implícitamente (solo el optimizador produce un orden nuevo explícito).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rota {
    pub id: String,
    pub nome: String,
    #[serde(default)]
    pub paradas: Vec<Parada>,
    /// Timestamp de creación en milisegundos unix (nombre legado del storage)
    #[serde(rename = "criadaEmMillis", default)]
    pub criada_em_millis: i64,
}

impl Rota {
    /// Crear ruta nueva, vacía, con identidad fresca
    pub fn new(nome: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            nome: nome.into(),
            paradas: Vec::new(),
            criada_em_millis: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn total_paradas(&self) -> usize {
        self.paradas.len()
    }

    pub fn pendentes(&self) -> usize {
        self.paradas.iter().filter(|p| p.status == StatusParada::Pendente).count()
    }

    /// Paradas en estado terminal (entregues + não entregues)
    pub fn concluidas(&self) -> usize {
        self.paradas.iter().filter(|p| p.status.is_finalizada()).count()
    }

    /// Serializar para el blob de storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializar desde el blob de storage
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
