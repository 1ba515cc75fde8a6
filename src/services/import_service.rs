// ============================================================================
// IMPORT SERVICE - importación de paradas desde planillas tabulares
// ============================================================================
// La planilla no necesita un esquema fijo: las columnas se buscan por varios
// nombres posibles y también por "contiene texto".
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::models::ImportedStop;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
    #[error("erro ao ler a planilha: {0}")]
    Csv(#[from] csv::Error),
}

/// Celda tal como la entrega la fuente tabular
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

/// Colaborador de lectura de archivos: entrega la grilla completa
/// (fila 0 = cabecera, filas siguientes = datos)
pub trait SheetSource {
    fn read_grid(&self) -> Result<Vec<Vec<CellValue>>, ImportError>;
}

/// Fuente CSV (crate `csv`); todas las celdas llegan como texto
pub struct CsvSheetSource {
    path: PathBuf,
}

impl CsvSheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SheetSource for CsvSheetSource {
    fn read_grid(&self) -> Result<Vec<Vec<CellValue>>, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record?;
            let fila = record
                .iter()
                .map(|celda| {
                    if celda.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(celda.to_string())
                    }
                })
                .collect();
            grid.push(fila);
        }
        Ok(grid)
    }
}

// Apelidos aceptados para cada campo lógico, en orden de prioridad
const ALIASES_ADDRESS: &[&str] = &[
    "destination address",
    "address",
    "endereço",
    "endereco",
    "endereco destino",
    "destination",
];
const ALIASES_LAT: &[&str] = &["latitude", "lat"];
const ALIASES_LNG: &[&str] = &["longitude", "long", "lng"];
const ALIASES_AT_ID: &[&str] = &["at id", "atid"];
const ALIASES_SPX_TN: &[&str] = &["spx tn", "spxtn", "spx_tn"];
const ALIASES_BAIRRO: &[&str] = &["bairro", "neighborhood", "neighbourhood"];
const ALIASES_CITY: &[&str] = &["city", "cidade"];
const ALIASES_ZIP: &[&str] = &["zipcode/postal code", "zipcode", "postal code", "cep"];

#[derive(Default)]
pub struct ImportService;

impl ImportService {
    pub fn new() -> Self {
        Self
    }

    /// Leer la fuente y mapear la grilla completa
    pub fn import_file(&self, source: &dyn SheetSource) -> Result<Vec<ImportedStop>, ImportError> {
        let grid = source.read_grid()?;
        let registros = self.map_grid(&grid);
        log::info!("📥 Planilla importada: {} registros extraídos", registros.len());
        Ok(registros)
    }

    /// Mapear una grilla ya leída a registros de importación.
    /// Una fila sin dirección se ignora por completo.
    pub fn map_grid(&self, grid: &[Vec<CellValue>]) -> Vec<ImportedStop> {
        let Some(header) = grid.first() else {
            return Vec::new();
        };

        // cabecera normalizada en minúsculas, conservando el orden de columnas
        let columnas: Vec<(String, usize)> = header
            .iter()
            .enumerate()
            .filter_map(|(idx, celda)| match celda {
                CellValue::Text(texto) => {
                    let limpio = texto.trim().to_lowercase();
                    if limpio.is_empty() { None } else { Some((limpio, idx)) }
                }
                CellValue::Number(n) => Some((n.to_string(), idx)),
                CellValue::Empty => None,
            })
            .collect();

        let idx_address = find_column_index(&columnas, ALIASES_ADDRESS);
        let idx_lat = find_column_index(&columnas, ALIASES_LAT);
        let idx_lng = find_column_index(&columnas, ALIASES_LNG);
        let idx_at_id = find_column_index(&columnas, ALIASES_AT_ID);
        let idx_spx_tn = find_column_index(&columnas, ALIASES_SPX_TN);
        let idx_bairro = find_column_index(&columnas, ALIASES_BAIRRO);
        let idx_city = find_column_index(&columnas, ALIASES_CITY);
        let idx_zip = find_column_index(&columnas, ALIASES_ZIP);

        let mut lista = Vec::new();
        for fila in grid.iter().skip(1) {
            let address = get_cell_string(fila, idx_address);
            // sin dirección la fila se descarta, tenga lo que tenga el resto
            let Some(address) = address else { continue };

            lista.push(ImportedStop {
                at_id: get_cell_string(fila, idx_at_id),
                spx_tn: get_cell_string(fila, idx_spx_tn),
                destination_address: Some(address),
                bairro: get_cell_string(fila, idx_bairro),
                city: get_cell_string(fila, idx_city),
                zipcode: get_cell_string(fila, idx_zip),
                latitude: get_cell_double(fila, idx_lat),
                longitude: get_cell_double(fila, idx_lng),
            });
        }
        lista
    }
}

/// Resolver el índice de columna de un campo:
/// 1) igualdad exacta (sin mayúsculas) en orden de prioridad de los apelidos
/// 2) si no hay, "contiene": gana la primera cabecera que contenga un apelido
fn find_column_index(columnas: &[(String, usize)], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        let clave = alias.trim().to_lowercase();
        if let Some((_, idx)) = columnas.iter().find(|(nombre, _)| *nombre == clave) {
            return Some(*idx);
        }
    }

    for (nombre, idx) in columnas {
        if aliases.iter().any(|alias| nombre.contains(&alias.trim().to_lowercase())) {
            return Some(*idx);
        }
    }

    None
}

fn get_cell_string(fila: &[CellValue], idx: Option<usize>) -> Option<String> {
    match fila.get(idx?)? {
        CellValue::Text(texto) => {
            let limpio = texto.trim();
            if limpio.is_empty() { None } else { Some(limpio.to_string()) }
        }
        CellValue::Number(n) => Some(n.to_string()),
        CellValue::Empty => None,
    }
}

/// Celda numérica directa o texto con coma decimal (" -23,555 " etc.)
fn get_cell_double(fila: &[CellValue], idx: Option<usize>) -> Option<f64> {
    match fila.get(idx?)? {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(texto) => texto.replace(',', ".").trim().parse().ok(),
        CellValue::Empty => None,
    }
}
