/// Registro transitorio producido por el mapeo de columnas de la planilla.
/// Todos los campos son opcionales: la planilla puede no traer la columna.
/// Un registro sin dirección nunca sale del importador.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportedStop {
    /// ID externo de rastreo ("AT ID")
    pub at_id: Option<String>,
    /// Número de tracking externo ("SPX TN")
    pub spx_tn: Option<String>,
    pub destination_address: Option<String>,
    pub bairro: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
