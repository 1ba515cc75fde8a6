use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status de una parada dentro del dominio de la app.
/// - `Pendente`: estado inicial, único no terminal
/// - `Entregue`: concluida con éxito
/// - `NaoEntregue`: intento frustrado / devolución / falla
///
/// Se serializa con los strings legados del storage ("PENDENTE", "ENTREGUE",
/// "NAO_ENTREGUE"); un valor desconocido se carga como `Pendente`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum StatusParada {
    #[default]
    Pendente,
    Entregue,
    NaoEntregue,
}

impl StatusParada {
    /// ¿La parada llegó a un estado terminal?
    pub fn is_finalizada(&self) -> bool {
        matches!(self, StatusParada::Entregue | StatusParada::NaoEntregue)
    }

    pub fn from_storage(valor: &str) -> Self {
        match valor.trim().to_uppercase().as_str() {
            "ENTREGUE" => StatusParada::Entregue,
            "NAO_ENTREGUE" | "NÃO_ENTREGUE" => StatusParada::NaoEntregue,
            _ => StatusParada::Pendente,
        }
    }

    pub fn as_storage(&self) -> &'static str {
        match self {
            StatusParada::Pendente => "PENDENTE",
            StatusParada::Entregue => "ENTREGUE",
            StatusParada::NaoEntregue => "NAO_ENTREGUE",
        }
    }
}

impl From<String> for StatusParada {
    fn from(valor: String) -> Self {
        StatusParada::from_storage(&valor)
    }
}

impl From<StatusParada> for String {
    fn from(status: StatusParada) -> Self {
        status.as_storage().to_string()
    }
}

/// Parada individual de una ruta de entrega.
/// El `id` es único por proceso: se genera fresco al crear y NUNCA se reusa
/// (las copias hacia otra ruta reciben identidad nueva, ver `duplicate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parada {
    pub id: String,
    pub endereco: String,
    /// Latitud/longitud: ambas presentes o ambas ausentes
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub observacao: Option<String>,
    #[serde(default)]
    pub status: StatusParada,
}

impl Parada {
    /// Crear parada nueva con identidad fresca y status Pendente
    pub fn new(endereco: impl Into<String>, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            endereco: endereco.into(),
            latitude,
            longitude,
            observacao: None,
            status: StatusParada::Pendente,
        }
    }

    /// Copia con identidad nueva y status reseteado a Pendente.
    /// La parada original no se modifica.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status: StatusParada::Pendente,
            ..self.clone()
        }
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
