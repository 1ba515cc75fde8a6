// ============================================================================
// OPTIMIZATION SERVICE - reordenamiento greedy por vecino más cercano
// ============================================================================

use crate::models::Parada;

/// Reordena las paradas con la heurística del vecino más cercano.
///
/// La primera parada de la lista actual es el punto de partida FIJO. En cada
/// paso se elige, entre las no visitadas, la de menor distancia euclidiana
/// al cuadrado en el espacio (lat, lng); una parada sin coordenadas cuenta
/// como (0, 0). Empates: gana la primera encontrada.
///
/// Greedy O(n²), determinista dado el orden y las coordenadas de entrada;
/// no revisita decisiones ni hace backtracking. El caller valida el mínimo
/// de paradas (la función en sí es total).
pub fn optimize_nearest_neighbor(paradas: &[Parada]) -> Vec<Parada> {
    if paradas.is_empty() {
        return Vec::new();
    }

    let mut pendentes: Vec<Parada> = paradas.to_vec();
    let mut otimizadas = Vec::with_capacity(pendentes.len());

    let mut atual = pendentes.remove(0);
    otimizadas.push(atual.clone());

    while !pendentes.is_empty() {
        let mut mais_proxima = 0usize;
        let mut menor_dist = dist_quadrada(&atual, &pendentes[0]);

        for (i, candidata) in pendentes.iter().enumerate().skip(1) {
            let dist = dist_quadrada(&atual, candidata);
            if dist < menor_dist {
                mais_proxima = i;
                menor_dist = dist;
            }
        }

        atual = pendentes.remove(mais_proxima);
        otimizadas.push(atual.clone());
    }

    otimizadas
}

/// Distancia euclidiana al cuadrado en el espacio lat/lng.
/// No es distancia geodésica: es la misma aproximación del origen.
fn dist_quadrada(a: &Parada, b: &Parada) -> f64 {
    let lat1 = a.latitude.unwrap_or(0.0);
    let lng1 = a.longitude.unwrap_or(0.0);
    let lat2 = b.latitude.unwrap_or(0.0);
    let lng2 = b.longitude.unwrap_or(0.0);
    (lat1 - lat2) * (lat1 - lat2) + (lng1 - lng2) * (lng1 - lng2)
}
