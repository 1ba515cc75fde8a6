// ============================================================================
// SESSION STATE - Estado observable de la sesión de ruta
// ============================================================================

use crate::models::{Parada, Rota};

/// Snapshot único e inmutable del estado de la sesión.
/// Se reemplaza completo en cada mutación (ver `ReactiveState`), de modo
/// que ningún consumidor puede observar campos a medio actualizar.
///
/// `paradas` se mantiene en sincronía con `rota_ativa.paradas`, pero son
/// listas distintas hasta el próximo guardado exitoso.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteUiState {
    pub is_loading: bool,
    pub rota_ativa: Option<Rota>,
    pub paradas: Vec<Parada>,
    pub erro: Option<String>,
    /// ¿Es la primera ruta del usuario? (recién creada en esta sesión)
    pub is_primeira_rota: bool,
}
