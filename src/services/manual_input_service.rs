// ============================================================================
// MANUAL INPUT SERVICE - texto libre -> dirección normalizada + coordenadas
// ============================================================================
// Este servicio NO persiste nada: solo resuelve y devuelve un resultado.
// El ViewModel decide cómo persistir.
// ============================================================================

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::CONFIG;
use crate::services::geocoding::{coordenadas_validas, Geocoder};

/// Localidades reconocidas: si el texto ya menciona alguna, no se agrega
/// contexto de ciudad
const CIDADES_CONHECIDAS: [&str; 7] =
    ["são paulo", "sao paulo", "sp", "rio de janeiro", "rj", "belo horizonte", "bh"];

const PAISES_CONHECIDOS: [&str; 2] = ["brasil", "brazil"];

lazy_static! {
    static ref RE_ESPACOS: Regex = Regex::new(r"\s+").expect("regex de espacios inválida");
    static ref RE_VIRGULAS: Regex = Regex::new(r",\s*,+").expect("regex de comas inválida");
}

/// Resultado de resolver texto libre: dirección normalizada + coordenadas
/// opcionales (ambas o ninguna)
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedParada {
    pub endereco: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub struct ManualInputService {
    geocoder: Arc<dyn Geocoder>,
}

impl ManualInputService {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// API principal usada por el ViewModel.
    /// Intenta geocodificar en etapas; si ninguna encuentra coordenadas,
    /// devuelve la dirección normalizada con lat/lng nulos. Ese resultado
    /// es un ÉXITO para el caller, no un error.
    pub fn resolve(&self, texto: &str) -> ParsedParada {
        let normalizado = normalizar_endereco(texto);

        // 1ª tentativa: la dirección tal como vino
        if let Some((lat, lng)) = self.geocode_validado(&normalizado) {
            return ParsedParada {
                endereco: normalizado,
                latitude: Some(lat),
                longitude: Some(lng),
            };
        }

        // 2ª tentativa: forzar contexto ciudad/país si no lo trae
        let enriquecido = enriquecer_endereco(&normalizado);
        if enriquecido != normalizado {
            if let Some((lat, lng)) = self.geocode_validado(&enriquecido) {
                // guardamos la dirección "limpia", no la enriquecida
                return ParsedParada {
                    endereco: normalizado,
                    latitude: Some(lat),
                    longitude: Some(lng),
                };
            }
        }

        // 3ª tentativa: heurística de sustituciones comunes
        let heuristico = heuristica_correcoes(&normalizado);
        if heuristico != normalizado {
            if let Some((lat, lng)) = self.geocode_validado(&heuristico) {
                return ParsedParada {
                    endereco: normalizado,
                    latitude: Some(lat),
                    longitude: Some(lng),
                };
            }
        }

        // No se pudo geocodificar: devolver sin coordenadas
        log::info!("📍 Geocode sin resultado para: {}", normalizado);
        ParsedParada { endereco: normalizado, latitude: None, longitude: None }
    }

    fn geocode_validado(&self, endereco: &str) -> Option<(f64, f64)> {
        let (lat, lng) = self.geocoder.geocode(endereco)?;
        if coordenadas_validas(lat, lng) {
            Some((lat, lng))
        } else {
            log::warn!("⚠️ Geocode fuera de rango para {}: ({}, {})", endereco, lat, lng);
            None
        }
    }
}

/// Colapsa espacios duplicados y comas sobrantes, y recorta extremos
pub fn normalizar_endereco(endereco: &str) -> String {
    let sem_espacos = RE_ESPACOS.replace_all(endereco, " ");
    let sem_virgulas = RE_VIRGULAS.replace_all(&sem_espacos, ", ");
    sem_virgulas.trim().to_string()
}

/// Si la dirección no menciona ciudad/UF/país, agrega el contexto por defecto
fn enriquecer_endereco(endereco: &str) -> String {
    let low = endereco.to_lowercase();
    let tem_cidade = CIDADES_CONHECIDAS.iter().any(|c| low.contains(c));
    let tem_pais = PAISES_CONHECIDOS.iter().any(|p| low.contains(p));

    let geo = &CONFIG.geocode;
    match (tem_cidade, tem_pais) {
        (false, false) => {
            format!("{}, {}, {}, {}", endereco, geo.default_city, geo.default_state, geo.default_country)
        }
        (_, false) => format!("{}, {}", endereco, geo.default_country),
        _ => endereco.to_string(),
    }
}

/// Ajustes rápidos de abreviaciones/errores comunes
fn heuristica_correcoes(endereco: &str) -> String {
    let mut corrigido = endereco.to_string();
    for (de, para) in [
        ("Av.", "Avenida"),
        ("R.", "Rua"),
        ("SP,", "SP, Brasil,"),
        ("São paulo", "São Paulo"),
    ] {
        corrigido = replace_ignore_case(&corrigido, de, para);
    }
    corrigido
}

fn replace_ignore_case(texto: &str, de: &str, para: &str) -> String {
    if de.is_empty() {
        return texto.to_string();
    }
    let chars: Vec<char> = texto.chars().collect();
    let patron: Vec<char> = de.chars().collect();

    let mut resultado = String::with_capacity(texto.len());
    let mut i = 0;
    while i < chars.len() {
        let coincide = i + patron.len() <= chars.len()
            && chars[i..i + patron.len()]
                .iter()
                .zip(&patron)
                .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()));
        if coincide {
            resultado.push_str(para);
            i += patron.len();
        } else {
            resultado.push(chars[i]);
            i += 1;
        }
    }
    resultado
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geocoding::NullGeocoder;
    use std::sync::Mutex;

    /// Geocoder de prueba: responde solo a las direcciones programadas y
    /// registra cada consulta recibida
    struct FakeGeocoder {
        respuestas: Vec<(String, (f64, f64))>,
        consultas: Mutex<Vec<String>>,
    }

    impl FakeGeocoder {
        fn con_respuestas(respuestas: &[(&str, (f64, f64))]) -> Self {
            Self {
                respuestas: respuestas
                    .iter()
                    .map(|(e, c)| (e.to_string(), *c))
                    .collect(),
                consultas: Mutex::new(Vec::new()),
            }
        }

        fn consultas(&self) -> Vec<String> {
            self.consultas.lock().unwrap().clone()
        }
    }

    impl Geocoder for FakeGeocoder {
        fn geocode(&self, endereco: &str) -> Option<(f64, f64)> {
            self.consultas.lock().unwrap().push(endereco.to_string());
            self.respuestas.iter().find(|(e, _)| e == endereco).map(|(_, c)| *c)
        }

        fn reverse_geocode(&self, _latitude: f64, _longitude: f64) -> Option<String> {
            None
        }
    }

    #[test]
    fn can_normalize_whitespace_and_commas() {
        assert_eq!(normalizar_endereco("  Rua  A,,  100  "), "Rua A, 100");
        assert_eq!(normalizar_endereco("Rua B,,, 7"), "Rua B, 7");
        assert_eq!(normalizar_endereco("Rua\tC,\n10"), "Rua C, 10");
        assert_eq!(normalizar_endereco("sin cambios"), "sin cambios");
    }

    #[test]
    fn can_resolve_on_first_attempt() {
        let geo = Arc::new(FakeGeocoder::con_respuestas(&[("Rua A, 100", (-23.5, -46.6))]));
        let service = ManualInputService::new(geo.clone());

        let parsed = service.resolve("  Rua  A,,  100  ");
        assert_eq!(parsed.endereco, "Rua A, 100");
        assert_eq!(parsed.latitude, Some(-23.5));
        assert_eq!(parsed.longitude, Some(-46.6));
        // una única consulta, ya normalizada
        assert_eq!(geo.consultas(), vec!["Rua A, 100"]);
    }

    #[test]
    fn can_enrich_with_default_context() {
        let geo = Arc::new(FakeGeocoder::con_respuestas(&[(
            "Rua A, 100, São Paulo, SP, Brasil",
            (-23.5, -46.6),
        )]));
        let service = ManualInputService::new(geo.clone());

        let parsed = service.resolve("Rua A, 100");
        // la dirección guardada es la limpia, no la enriquecida
        assert_eq!(parsed.endereco, "Rua A, 100");
        assert_eq!(parsed.latitude, Some(-23.5));
        assert_eq!(
            geo.consultas(),
            vec!["Rua A, 100", "Rua A, 100, São Paulo, SP, Brasil"]
        );
    }

    #[test]
    fn can_append_only_country_when_city_present() {
        let geo = Arc::new(FakeGeocoder::con_respuestas(&[]));
        let service = ManualInputService::new(geo.clone());

        service.resolve("Rua X, Belo Horizonte");
        let consultas = geo.consultas();
        assert!(consultas.contains(&"Rua X, Belo Horizonte, Brasil".to_string()));
        assert!(!consultas.iter().any(|c| c.contains("São Paulo, SP")));
    }

    #[test]
    fn can_apply_abbreviation_heuristics() {
        let geo = Arc::new(FakeGeocoder::con_respuestas(&[(
            "Avenida Central, 1, Brasil",
            (-20.0, -40.0),
        )]));
        let service = ManualInputService::new(geo.clone());

        let parsed = service.resolve("Av. Central, 1, Brasil");
        assert_eq!(parsed.endereco, "Av. Central, 1, Brasil");
        assert_eq!(parsed.latitude, Some(-20.0));
    }

    #[test]
    fn can_fall_back_to_null_coordinates() {
        let service = ManualInputService::new(Arc::new(NullGeocoder));
        let parsed = service.resolve("  Rua  Inexistente,,  999  ");
        // el fallo de resolución degrada, no bloquea
        assert_eq!(parsed.endereco, "Rua Inexistente, 999");
        assert!(parsed.latitude.is_none());
        assert!(parsed.longitude.is_none());
    }

    #[test]
    fn can_reject_out_of_range_coordinates() {
        // el geocoder responde, pero fuera de rango: se trata como miss
        let geo = Arc::new(FakeGeocoder::con_respuestas(&[("Rua A, Brasil", (120.0, 300.0))]));
        let service = ManualInputService::new(geo);

        let parsed = service.resolve("Rua A, Brasil");
        assert!(parsed.latitude.is_none());
        assert!(parsed.longitude.is_none());
    }

    #[test]
    fn can_replace_ignoring_case() {
        assert_eq!(replace_ignore_case("av. central e AV. norte", "Av.", "Avenida"),
                   "Avenida central e Avenida norte");
        assert_eq!(replace_ignore_case("são paulo", "São paulo", "São Paulo"), "São Paulo");
    }
}
