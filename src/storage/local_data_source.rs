use std::sync::Arc;

use tokio::sync::watch;

use crate::models::Rota;
use crate::storage::kv::{load_from_store, save_to_store, KeyValueStore, StorageError};

/// Clave única bajo la que se persiste la lista completa de rutas
/// (nombre legado del storage original)
const KEY_ROTAS: &str = "rotas_list_json";

/// Fuente de datos local: persiste TODAS las rutas como un único blob JSON
/// y re-emite la lista completa después de cada escritura exitosa.
/// Cada guardado es una sobreescritura ruta-completa; no hay transacciones
/// entre rutas.
pub struct LocalDataSource {
    store: Arc<dyn KeyValueStore>,
    rotas_tx: watch::Sender<Vec<Rota>>,
}

impl LocalDataSource {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let iniciais = load_from_store::<Vec<Rota>>(store.as_ref(), KEY_ROTAS)
            .unwrap_or_else(|e| {
                log::error!("❌ Error cargando rutas del storage: {}", e);
                None
            })
            .unwrap_or_default();
        let (rotas_tx, _) = watch::channel(iniciais);
        Self { store, rotas_tx }
    }

    fn carregar_lista(&self) -> Result<Vec<Rota>, StorageError> {
        Ok(load_from_store(self.store.as_ref(), KEY_ROTAS)?.unwrap_or_default())
    }

    fn salvar_lista(&self, rotas: Vec<Rota>) -> Result<(), StorageError> {
        save_to_store(self.store.as_ref(), KEY_ROTAS, &rotas)?;
        self.rotas_tx.send_replace(rotas);
        Ok(())
    }

    /// Lista completa de rutas guardadas (clave ausente = lista vacía)
    pub fn get_rotas(&self) -> Result<Vec<Rota>, StorageError> {
        self.carregar_lista()
    }

    /// Stream observable de la lista de rutas
    pub fn observe_rotas(&self) -> watch::Receiver<Vec<Rota>> {
        self.rotas_tx.subscribe()
    }

    /// Guardar/sobreescribir una ruta.
    /// Una ruta existente conserva su posición en la lista; una nueva se
    /// agrega al final.
    pub fn save_rota(&self, rota: &Rota) -> Result<(), StorageError> {
        let mut lista = self.carregar_lista()?;
        match lista.iter_mut().find(|r| r.id == rota.id) {
            Some(existente) => *existente = rota.clone(),
            None => lista.push(rota.clone()),
        }
        self.salvar_lista(lista)?;
        log::info!("💾 Rota guardada: {} ({} paradas)", rota.id, rota.paradas.len());
        Ok(())
    }

    pub fn delete_rota(&self, rota_id: &str) -> Result<(), StorageError> {
        let mut lista = self.carregar_lista()?;
        lista.retain(|r| r.id != rota_id);
        self.salvar_lista(lista)?;
        log::info!("🗑️ Rota eliminada: {}", rota_id);
        Ok(())
    }
}
