use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{Parada, Rota, StatusParada};
use crate::storage::{LocalDataSource, StorageError};

/// Repositorio de rutas: CRUD a nivel ruta + helpers a nivel parada.
/// Cada helper de parada es un read-modify-write que sobreescribe la ruta
/// completa; una ruta desconocida es un no-op silencioso.
pub struct RouteRepository {
    local: Arc<LocalDataSource>,
}

impl RouteRepository {
    pub fn new(local: Arc<LocalDataSource>) -> Self {
        Self { local }
    }

    pub fn observar_rotas(&self) -> watch::Receiver<Vec<Rota>> {
        self.local.observe_rotas()
    }

    pub fn get_rotas(&self) -> Result<Vec<Rota>, StorageError> {
        self.local.get_rotas()
    }

    pub fn get_rota_by_id(&self, rota_id: &str) -> Result<Option<Rota>, StorageError> {
        Ok(self.get_rotas()?.into_iter().find(|r| r.id == rota_id))
    }

    /// La ruta "actual" de la sesión: la primera en el orden guardado.
    /// Los guardados conservan posiciones, así que es estable entre llamadas.
    pub fn get_rota_atual(&self) -> Result<Option<Rota>, StorageError> {
        Ok(self.get_rotas()?.into_iter().next())
    }

    pub fn save_rota(&self, rota: &Rota) -> Result<(), StorageError> {
        self.local.save_rota(rota)
    }

    pub fn delete_rota(&self, rota_id: &str) -> Result<(), StorageError> {
        self.local.delete_rota(rota_id)
    }

    pub fn add_parada(&self, rota_id: &str, parada: Parada) -> Result<(), StorageError> {
        let Some(mut rota) = self.get_rota_by_id(rota_id)? else {
            return Ok(());
        };
        rota.paradas.push(parada);
        self.save_rota(&rota)
    }

    pub fn update_parada(&self, rota_id: &str, parada: Parada) -> Result<(), StorageError> {
        let Some(mut rota) = self.get_rota_by_id(rota_id)? else {
            return Ok(());
        };
        for p in rota.paradas.iter_mut() {
            if p.id == parada.id {
                *p = parada.clone();
            }
        }
        self.save_rota(&rota)
    }

    pub fn remove_parada(&self, rota_id: &str, parada_id: &str) -> Result<(), StorageError> {
        let Some(mut rota) = self.get_rota_by_id(rota_id)? else {
            return Ok(());
        };
        rota.paradas.retain(|p| p.id != parada_id);
        self.save_rota(&rota)
    }

    pub fn update_parada_status(
        &self,
        rota_id: &str,
        parada_id: &str,
        novo_status: StatusParada,
    ) -> Result<(), StorageError> {
        let Some(mut rota) = self.get_rota_by_id(rota_id)? else {
            return Ok(());
        };
        for p in rota.paradas.iter_mut() {
            if p.id == parada_id {
                p.status = novo_status;
            }
        }
        self.save_rota(&rota)
    }
}
