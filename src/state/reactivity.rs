// ============================================================================
// REACTIVITY - Sistema de notificaciones/subscribers para reactividad
// ============================================================================

use std::sync::Arc;

use tokio::sync::watch;

/// Estado reactivo: un snapshot inmutable reemplazado de forma atómica.
/// Los subscribers observan siempre el snapshot completo más reciente;
/// nunca un valor parcialmente mutado.
pub struct ReactiveState<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T: Clone> ReactiveState<T> {
    /// Crear nuevo estado reactivo
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// Obtener una copia del snapshot actual
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Establecer nuevo valor y notificar subscribers
    pub fn set(&self, new_value: T) {
        self.tx.send_replace(new_value);
    }

    /// Actualizar el snapshot completo bajo el lock del canal.
    /// Los lectores concurrentes ven el valor anterior o el nuevo, nunca
    /// un estado intermedio.
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        self.tx.send_modify(updater);
    }

    /// Suscribirse a cambios
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}
