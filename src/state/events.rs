// ============================================================================
// EVENTS - Eventos one-shot de la sesión de ruta
// ============================================================================

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::models::{Parada, Rota};

/// Eventos de UI emitidos por el RouteViewModel.
/// Se consumen exactamente una vez; no se re-emiten al re-suscribirse.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteUiEvent {
    /// Mensaje informativo (snackbar)
    ShowMessage(String),
    /// Mensaje de error (snackbar)
    ShowError(String),
    /// Compartir el archivo generado (uri opaca)
    ShareFile(String),
    /// Imprimir/visualizar el archivo generado (uri opaca)
    PrintFile(String),
    /// Abrir diálogo "copiar paradas a otra ruta" con las candidatas
    ShowCopyDialog(Vec<Rota>),
    /// Abrir diálogo "remover paradas" con las candidatas
    ShowRemoveDialog(Vec<Parada>),
}

/// Cola de eventos one-shot con buffer acotado.
/// `send` nunca bloquea al emisor: si la cola está llena el evento se
/// descarta (último recurso) dejando un warning en el log.
pub struct EventQueue<T> {
    tx: mpsc::Sender<T>,
    rx: Mutex<Option<mpsc::Receiver<T>>>,
}

impl<T> EventQueue<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self { tx, rx: Mutex::new(Some(rx)) }
    }

    /// Emitir un evento sin bloquear
    pub fn send(&self, event: T) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("⚠️ Cola de eventos llena, evento descartado");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::warn!("⚠️ Cola de eventos cerrada, evento descartado");
            }
        }
    }

    /// Tomar el consumidor único de la cola.
    /// La primera llamada devuelve el receiver; las siguientes, `None`.
    pub fn subscribe(&self) -> Option<mpsc::Receiver<T>> {
        let mut guard = self.rx.lock().ok()?;
        guard.take()
    }
}
