// ============================================================================
// EXPORT SERVICE - generación de archivos para compartir / imprimir
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::CONFIG;
use crate::models::Parada;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
    #[error("mecanismo de compartilhamento indisponível")]
    ProviderUnavailable,
}

/// Colaborador de la plataforma que convierte una ruta de archivo en una
/// referencia compartible opaca (content provider, sandbox, etc.)
pub trait ShareUriProvider: Send + Sync {
    fn share_uri(&self, path: &Path) -> Result<String, ExportError>;
}

/// Provider nulo: fuerza siempre el fallback a `file://`
pub struct NoProvider;

impl ShareUriProvider for NoProvider {
    fn share_uri(&self, _path: &Path) -> Result<String, ExportError> {
        Err(ExportError::ProviderUnavailable)
    }
}

/// Genera los archivos de exportación de la ruta activa: texto plano UTF-8,
/// una dirección por línea, en el directorio de cache de la app.
pub struct ExportService {
    cache_dir: PathBuf,
    provider: Arc<dyn ShareUriProvider>,
}

impl ExportService {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self { cache_dir: cache_dir.into(), provider: Arc::new(NoProvider) }
    }

    pub fn with_provider(cache_dir: impl Into<PathBuf>, provider: Arc<dyn ShareUriProvider>) -> Self {
        Self { cache_dir: cache_dir.into(), provider }
    }

    pub fn write_share_file(&self, paradas: &[Parada]) -> Result<PathBuf, ExportError> {
        self.write_file(&CONFIG.export.share_file_name, paradas)
    }

    pub fn write_print_file(&self, paradas: &[Parada]) -> Result<PathBuf, ExportError> {
        self.write_file(&CONFIG.export.print_file_name, paradas)
    }

    fn write_file(&self, nome: &str, paradas: &[Parada]) -> Result<PathBuf, ExportError> {
        let conteudo =
            paradas.iter().map(|p| p.endereco.as_str()).collect::<Vec<_>>().join("\n");

        fs::create_dir_all(&self.cache_dir)?;
        let path = self.cache_dir.join(nome);
        fs::write(&path, conteudo)?;
        log::info!("📄 Archivo de exportación generado: {}", path.display());
        Ok(path)
    }

    /// Referencia compartible del archivo; si el provider de la plataforma
    /// no está disponible, cae a una referencia directa `file://`
    pub fn resolve_share_uri(&self, path: &Path) -> String {
        match self.provider.share_uri(path) {
            Ok(uri) => uri,
            Err(e) => {
                log::error!("❌ Provider de compartir no configurado o con error: {}", e);
                format!("file://{}", path.display())
            }
        }
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("rota_rapida"))
    }
}
