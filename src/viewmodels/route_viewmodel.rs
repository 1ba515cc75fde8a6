// ============================================================================
// ROUTE VIEWMODEL - LÓGICA DE SESIÓN DE RUTA
// ============================================================================
// Única fuente de verdad de "la ruta en la que se está trabajando".
// Expone un snapshot observable (RouteUiState) + una cola de eventos
// one-shot (RouteUiEvent). Ningún fallo escapa del límite de la operación:
// todo se reporta vía evento de error + campo `erro` del estado.
// ============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::config::CONFIG;
use crate::models::{Parada, Rota, StatusParada};
use crate::repository::RouteRepository;
use crate::services::{
    optimize_nearest_neighbor, ExportService, ImportService, ManualInputService, SheetSource,
};
use crate::state::{EventQueue, ReactiveState, RouteUiEvent, RouteUiState};

pub struct RouteViewModel {
    repo: Arc<RouteRepository>,
    manual: ManualInputService,
    import: ImportService,
    export: ExportService,
    state: ReactiveState<RouteUiState>,
    events: EventQueue<RouteUiEvent>,
}

impl RouteViewModel {
    pub fn new(
        repo: Arc<RouteRepository>,
        manual: ManualInputService,
        import: ImportService,
        export: ExportService,
    ) -> Self {
        Self {
            repo,
            manual,
            import,
            export,
            state: ReactiveState::new(RouteUiState::default()),
            events: EventQueue::new(CONFIG.event_queue_capacity),
        }
    }

    /// Snapshot actual del estado de la sesión
    pub fn ui_state(&self) -> RouteUiState {
        self.state.get()
    }

    /// Suscripción al estado observable
    pub fn subscribe(&self) -> watch::Receiver<RouteUiState> {
        self.state.subscribe()
    }

    /// Consumidor único de los eventos one-shot (la primera llamada se lo
    /// lleva; las siguientes devuelven None)
    pub fn take_events(&self) -> Option<mpsc::Receiver<RouteUiEvent>> {
        self.events.subscribe()
    }

    // ========================================================================
    // FLUJO PRINCIPAL DE RUTA
    // ========================================================================

    /// Crea o carga la ruta actual y la define como activa.
    /// Idempotente: una segunda llamada encuentra la ruta ya persistida.
    pub async fn iniciar_nova_rota(&self) {
        self.state.update(|s| s.is_loading = true);

        match self.repo.get_rota_atual() {
            Ok(Some(rota)) => {
                log::info!("📋 Rota existente cargada: {}", rota.id);
                let paradas = rota.paradas.clone();
                self.state.update(move |s| {
                    s.is_loading = false;
                    s.rota_ativa = Some(rota);
                    s.paradas = paradas;
                    s.is_primeira_rota = false;
                });
            }
            Ok(None) => {
                let nova_rota = Rota::new(CONFIG.default_route_name.as_str());

                if let Err(e) = self.repo.save_rota(&nova_rota) {
                    log::error!("❌ Error guardando la ruta nueva: {}", e);
                    self.state.update(|s| s.erro = Some(e.to_string()));
                    self.events
                        .send(RouteUiEvent::ShowError(format!("Erro ao criar rota: {}", e)));
                }

                log::info!("🚀 Nueva ruta iniciada: {}", nova_rota.id);
                self.state.update(move |s| {
                    s.is_loading = false;
                    s.rota_ativa = Some(nova_rota);
                    s.paradas = Vec::new();
                    s.is_primeira_rota = true;
                });
            }
            Err(e) => {
                log::error!("❌ Error cargando la ruta actual: {}", e);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.erro = Some(e.to_string());
                });
                self.events
                    .send(RouteUiEvent::ShowError(format!("Erro ao carregar rota: {}", e)));
            }
        }
    }

    /// Agregar una parada desde texto libre.
    /// Input en blanco: no-op puro (sin cambio de estado ni eventos).
    /// Un miss de geocodificación degrada a coordenadas nulas, nunca bloquea.
    pub async fn adicionar_parada(&self, endereco: &str) {
        if endereco.trim().is_empty() {
            return;
        }

        self.state.update(|s| s.is_loading = true);
        log::info!("➕ Agregando parada: {}", endereco);

        let resolvido = self.manual.resolve(endereco);
        let parada = Parada::new(resolvido.endereco, resolvido.latitude, resolvido.longitude);
        let endereco_final = parada.endereco.clone();

        self.state.update(move |s| {
            s.is_loading = false;
            s.paradas.push(parada);
            s.erro = None;
        });

        if self.salvar_rota_atual().await {
            log::info!("✅ Parada agregada con éxito: {}", endereco_final);
            self.events.send(RouteUiEvent::ShowMessage("Parada adicionada!".to_string()));
        }
    }

    /// Importar paradas desde una planilla tabular.
    /// Las coordenadas vienen directo de las columnas: acá NO se geocodifica.
    pub async fn importar_planilha(&self, source: &dyn SheetSource) {
        self.state.update(|s| s.is_loading = true);

        match self.import.import_file(source) {
            Err(e) => {
                // el read falló: se aborta sin tocar la lista
                log::error!("❌ Error importando planilla: {}", e);
                self.state.update(|s| s.is_loading = false);
                self.events.send(RouteUiEvent::ShowError(format!("Erro ao importar: {}", e)));
            }
            Ok(registros) if registros.is_empty() => {
                self.state.update(|s| s.is_loading = false);
                self.events.send(RouteUiEvent::ShowMessage(
                    "Nenhuma parada encontrada na planilha.".to_string(),
                ));
            }
            Ok(registros) => {
                let novas: Vec<Parada> = registros
                    .iter()
                    .map(|item| {
                        Parada::new(
                            item.destination_address.clone().unwrap_or_default(),
                            item.latitude,
                            item.longitude,
                        )
                    })
                    .collect();
                let cantidad = novas.len();

                self.state.update(move |s| {
                    s.paradas.extend(novas);
                    s.is_loading = false;
                });

                if self.salvar_rota_atual().await {
                    self.events.send(RouteUiEvent::ShowMessage(format!(
                        "{} paradas importadas.",
                        cantidad
                    )));
                }
            }
        }
    }

    /// Reemplazo in-place del status de una parada; el orden no se toca
    pub async fn atualizar_status_parada(&self, parada_id: &str, novo_status: StatusParada) {
        let parada_id = parada_id.to_string();
        self.state.update(move |s| {
            for p in s.paradas.iter_mut() {
                if p.id == parada_id {
                    p.status = novo_status;
                }
            }
        });
        self.salvar_rota_atual().await;
    }

    /// Remueve toda parada ENTREGUE; NAO_ENTREGUE es terminal pero se
    /// conserva para seguimiento
    pub async fn remover_paradas_concluidas(&self) {
        self.state.update(|s| s.paradas.retain(|p| p.status != StatusParada::Entregue));

        if self.salvar_rota_atual().await {
            self.events
                .send(RouteUiEvent::ShowMessage("Paradas concluídas removidas.".to_string()));
        }
    }

    // ========================================================================
    // FUNCIONALIDADES DEL MENÚ (3 PUNTOS)
    // ========================================================================

    /// Genera el archivo de compartir y emite el evento con su referencia
    pub async fn share_route(&self) {
        let paradas = self.state.get().paradas;
        if paradas.is_empty() {
            self.events.send(RouteUiEvent::ShowMessage(
                "Rota vazia, nada para compartilhar.".to_string(),
            ));
            return;
        }

        match self.export.write_share_file(&paradas) {
            Ok(path) => {
                let uri = self.export.resolve_share_uri(&path);
                self.events.send(RouteUiEvent::ShareFile(uri));
            }
            Err(e) => {
                log::error!("❌ Error generando archivo de compartir: {}", e);
                self.events
                    .send(RouteUiEvent::ShowError(format!("Erro ao gerar arquivo: {}", e)));
            }
        }
    }

    pub async fn print_route(&self) {
        let paradas = self.state.get().paradas;
        if paradas.is_empty() {
            self.events.send(RouteUiEvent::ShowMessage("Nada para imprimir.".to_string()));
            return;
        }

        match self.export.write_print_file(&paradas) {
            Ok(path) => {
                let uri = self.export.resolve_share_uri(&path);
                self.events.send(RouteUiEvent::PrintFile(uri));
            }
            Err(e) => {
                self.events
                    .send(RouteUiEvent::ShowError(format!("Erro ao gerar impressão: {}", e)));
            }
        }
    }

    /// Carga las rutas candidatas para copiar paradas: la activa primero,
    /// el resto conserva el orden guardado
    pub async fn load_routes_for_copy(&self) {
        let todas_rotas = self.repo.get_rotas().unwrap_or_default();

        let rota_atual_id = self.state.get().rota_ativa.map(|r| r.id);
        let mut ordenadas = todas_rotas;
        ordenadas.sort_by_key(|rota| rota_atual_id.as_deref() != Some(rota.id.as_str()));

        self.events.send(RouteUiEvent::ShowCopyDialog(ordenadas));
    }

    /// Copia cada parada de la ruta activa hacia la ruta destino, una por
    /// una, con identidad nueva y status reseteado a Pendente.
    /// Best-effort: las copias ya escritas no se deshacen; el resultado se
    /// reporta como resumen por ítem.
    pub async fn copy_stops_to_route(&self, target_rota: &Rota) {
        let paradas_atuais = self.state.get().paradas;
        if paradas_atuais.is_empty() {
            self.events.send(RouteUiEvent::ShowMessage(
                "Rota atual não tem paradas para copiar.".to_string(),
            ));
            return;
        }

        self.state.update(|s| s.is_loading = true);

        let mut copiadas = 0usize;
        let mut falhas = 0usize;
        for parada in &paradas_atuais {
            match self.repo.add_parada(&target_rota.id, parada.duplicate()) {
                Ok(()) => copiadas += 1,
                Err(e) => {
                    falhas += 1;
                    log::error!("❌ Error copiando parada {}: {}", parada.id, e);
                }
            }
        }

        if falhas == 0 {
            self.events.send(RouteUiEvent::ShowMessage(format!(
                "Paradas copiadas para {}",
                target_rota.nome
            )));
        } else {
            self.events.send(RouteUiEvent::ShowError(format!(
                "Erro ao copiar: {} copiadas, {} falharam",
                copiadas, falhas
            )));
        }

        self.state.update(|s| s.is_loading = false);
    }

    /// Reordena la ruta activa con el vecino más cercano (ver
    /// `optimization_service`). Menos de 3 paradas: aviso, no error.
    pub async fn optimize_route(&self) {
        let paradas = self.state.get().paradas;
        if paradas.len() < 3 {
            self.events
                .send(RouteUiEvent::ShowMessage("Poucas paradas para otimizar.".to_string()));
            return;
        }

        self.state.update(|s| s.is_loading = true);

        let otimizadas = optimize_nearest_neighbor(&paradas);

        self.state.update(move |s| {
            s.paradas = otimizadas;
            s.is_loading = false;
        });

        if self.salvar_rota_atual().await {
            self.events.send(RouteUiEvent::ShowMessage("Rota reotimizada!".to_string()));
        }
    }

    /// Abre el diálogo de selección de paradas a remover
    pub fn open_remove_dialog(&self) {
        let paradas = self.state.get().paradas;
        if paradas.is_empty() {
            self.events
                .send(RouteUiEvent::ShowMessage("Nenhuma parada para remover.".to_string()));
            return;
        }
        self.events.send(RouteUiEvent::ShowRemoveDialog(paradas));
    }

    /// Remueve el conjunto de paradas seleccionado
    pub async fn remove_stops(&self, ids_to_remove: &[String]) {
        self.state.update(|s| s.is_loading = true);

        let ids: HashSet<&str> = ids_to_remove.iter().map(String::as_str).collect();
        self.state.update(move |s| {
            s.paradas.retain(|p| !ids.contains(p.id.as_str()));
            s.is_loading = false;
        });

        if self.salvar_rota_atual().await {
            self.events.send(RouteUiEvent::ShowMessage(format!(
                "{} paradas removidas.",
                ids_to_remove.len()
            )));
        }
    }

    // ========================================================================
    // PERSISTENCIA
    // ========================================================================

    /// Copia la lista de paradas en memoria dentro de la ruta activa y la
    /// persiste (sobreescritura de ruta completa). Un fallo se reporta vía
    /// evento + campo `erro`; el cambio en memoria queda aplicado igual.
    async fn salvar_rota_atual(&self) -> bool {
        let snapshot = self.state.get();
        let Some(rota) = snapshot.rota_ativa else {
            // sin ruta activa no hay nada que persistir
            return true;
        };

        let rota_atualizada = Rota { paradas: snapshot.paradas.clone(), ..rota };

        match self.repo.save_rota(&rota_atualizada) {
            Ok(()) => {
                self.state.update(move |s| s.rota_ativa = Some(rota_atualizada));
                true
            }
            Err(e) => {
                log::error!("❌ Error guardando la ruta actual: {}", e);
                self.state.update(|s| s.erro = Some(e.to_string()));
                self.events
                    .send(RouteUiEvent::ShowError(format!("Erro ao salvar rota: {}", e)));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{CellValue, ImportError, NullGeocoder};
    use crate::storage::{KeyValueStore, LocalDataSource, MemoryStore, StorageError};
    use tokio::sync::mpsc::Receiver;

    fn viewmodel_con_store(store: Arc<dyn KeyValueStore>) -> RouteViewModel {
        let repo = Arc::new(RouteRepository::new(Arc::new(LocalDataSource::new(store))));
        let export_dir = tempfile::tempdir().unwrap().keep();
        RouteViewModel::new(
            repo,
            ManualInputService::new(Arc::new(NullGeocoder)),
            ImportService::new(),
            ExportService::new(export_dir),
        )
    }

    fn viewmodel() -> RouteViewModel {
        viewmodel_con_store(Arc::new(MemoryStore::new()))
    }

    fn siguiente_mensaje(rx: &mut Receiver<RouteUiEvent>) -> RouteUiEvent {
        rx.try_recv().expect("se esperaba un evento en la cola")
    }

    #[tokio::test]
    async fn can_create_first_route_when_storage_is_empty() {
        let vm = viewmodel();
        vm.iniciar_nova_rota().await;

        let state = vm.ui_state();
        assert!(!state.is_loading);
        assert!(state.is_primeira_rota);
        let rota = state.rota_ativa.expect("debe haber ruta activa");
        assert_eq!(rota.nome, "Rota de hoje");
        assert!(state.paradas.is_empty());
    }

    #[tokio::test]
    async fn can_resume_the_same_route_idempotently() {
        let vm = viewmodel();
        vm.iniciar_nova_rota().await;
        let primera_id = vm.ui_state().rota_ativa.unwrap().id;

        vm.iniciar_nova_rota().await;
        let segunda = vm.ui_state();

        // la segunda llamada encuentra la ruta persistida, no crea otra
        assert_eq!(segunda.rota_ativa.unwrap().id, primera_id);
        assert!(!segunda.is_primeira_rota);
    }

    #[tokio::test]
    async fn can_ignore_blank_address_input() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;
        let _ = eventos.try_recv(); // drenar cualquier evento del arranque

        vm.adicionar_parada("   ").await;

        assert!(vm.ui_state().paradas.is_empty());
        assert!(eventos.try_recv().is_err());
    }

    #[tokio::test]
    async fn can_add_stop_with_null_coordinates_on_geocode_miss() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;

        vm.adicionar_parada("  Rua  A,,  100  ").await;

        let state = vm.ui_state();
        assert_eq!(state.paradas.len(), 1);
        assert_eq!(state.paradas[0].endereco, "Rua A, 100");
        assert!(!state.paradas[0].has_coordinates());
        assert_eq!(state.paradas[0].status, StatusParada::Pendente);
        assert!(state.erro.is_none());

        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage("Parada adicionada!".to_string())
        );

        // y quedó persistida dentro de la ruta activa
        let rota = state.rota_ativa.unwrap();
        assert_eq!(rota.paradas.len(), 1);
    }

    #[tokio::test]
    async fn can_import_stops_without_geocoding() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;

        struct GridFija;
        impl SheetSource for GridFija {
            fn read_grid(&self) -> Result<Vec<Vec<CellValue>>, ImportError> {
                Ok(vec![
                    vec![
                        CellValue::Text("Destination Address".into()),
                        CellValue::Text("Lat".into()),
                        CellValue::Text("Lng".into()),
                    ],
                    vec![
                        CellValue::Text("Rua A, 100".into()),
                        CellValue::Text("-23.5".into()),
                        CellValue::Text("-46.6".into()),
                    ],
                    vec![
                        CellValue::Text("Rua B, 200".into()),
                        CellValue::Empty,
                        CellValue::Empty,
                    ],
                ])
            }
        }

        vm.importar_planilha(&GridFija).await;

        let state = vm.ui_state();
        assert_eq!(state.paradas.len(), 2);
        assert_eq!(state.paradas[0].latitude, Some(-23.5));
        assert_eq!(state.paradas[0].status, StatusParada::Pendente);
        assert!(!state.paradas[1].has_coordinates());

        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage("2 paradas importadas.".to_string())
        );
    }

    #[tokio::test]
    async fn can_report_empty_spreadsheet_as_message() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;

        struct GridVacia;
        impl SheetSource for GridVacia {
            fn read_grid(&self) -> Result<Vec<Vec<CellValue>>, ImportError> {
                Ok(vec![vec![CellValue::Text("Address".into())]])
            }
        }

        vm.importar_planilha(&GridVacia).await;

        assert!(vm.ui_state().paradas.is_empty());
        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage("Nenhuma parada encontrada na planilha.".to_string())
        );
    }

    #[tokio::test]
    async fn can_abort_import_on_read_failure() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;
        vm.adicionar_parada("Rua A").await;
        let _ = eventos.try_recv();

        struct GridRota;
        impl SheetSource for GridRota {
            fn read_grid(&self) -> Result<Vec<Vec<CellValue>>, ImportError> {
                Err(ImportError::Io(std::io::Error::other("archivo corrupto")))
            }
        }

        vm.importar_planilha(&GridRota).await;

        // sin cambios parciales de estado
        let state = vm.ui_state();
        assert_eq!(state.paradas.len(), 1);
        assert!(!state.is_loading);
        assert!(matches!(siguiente_mensaje(&mut eventos), RouteUiEvent::ShowError(_)));
    }

    #[tokio::test]
    async fn can_update_status_preserving_identity_and_order() {
        let vm = viewmodel();
        vm.iniciar_nova_rota().await;
        vm.adicionar_parada("Rua A").await;
        vm.adicionar_parada("Rua B").await;

        let ids: Vec<String> = vm.ui_state().paradas.iter().map(|p| p.id.clone()).collect();
        vm.atualizar_status_parada(&ids[0], StatusParada::Entregue).await;

        let state = vm.ui_state();
        assert_eq!(state.paradas[0].id, ids[0]);
        assert_eq!(state.paradas[0].status, StatusParada::Entregue);
        assert_eq!(state.paradas[1].id, ids[1]);
        assert_eq!(state.paradas[1].status, StatusParada::Pendente);
    }

    #[tokio::test]
    async fn can_remove_only_delivered_stops() {
        let vm = viewmodel();
        vm.iniciar_nova_rota().await;
        vm.adicionar_parada("A").await;
        vm.adicionar_parada("B").await;
        vm.adicionar_parada("C").await;

        let ids: Vec<String> = vm.ui_state().paradas.iter().map(|p| p.id.clone()).collect();
        vm.atualizar_status_parada(&ids[1], StatusParada::Entregue).await;
        vm.atualizar_status_parada(&ids[2], StatusParada::NaoEntregue).await;

        vm.remover_paradas_concluidas().await;

        // ENTREGUE sale; NAO_ENTREGUE es terminal pero se queda
        let state = vm.ui_state();
        let restantes: Vec<&str> = state.paradas.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(restantes, vec![ids[0].as_str(), ids[2].as_str()]);
    }

    #[tokio::test]
    async fn can_remove_stops_by_id_set() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;
        vm.adicionar_parada("A").await;
        vm.adicionar_parada("B").await;
        vm.adicionar_parada("C").await;
        while eventos.try_recv().is_ok() {}

        let ids: Vec<String> = vm.ui_state().paradas.iter().map(|p| p.id.clone()).collect();
        vm.remove_stops(&[ids[0].clone(), ids[2].clone()]).await;

        let state = vm.ui_state();
        assert_eq!(state.paradas.len(), 1);
        assert_eq!(state.paradas[0].id, ids[1]);
        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage("2 paradas removidas.".to_string())
        );
    }

    #[tokio::test]
    async fn can_refuse_to_optimize_fewer_than_three_stops() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;
        vm.adicionar_parada("A").await;
        vm.adicionar_parada("B").await;
        while eventos.try_recv().is_ok() {}

        let antes: Vec<String> = vm.ui_state().paradas.iter().map(|p| p.id.clone()).collect();
        vm.optimize_route().await;

        let despues: Vec<String> = vm.ui_state().paradas.iter().map(|p| p.id.clone()).collect();
        assert_eq!(antes, despues);
        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage("Poucas paradas para otimizar.".to_string())
        );
    }

    #[tokio::test]
    async fn can_optimize_route_in_place() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;

        struct GridGeo;
        impl SheetSource for GridGeo {
            fn read_grid(&self) -> Result<Vec<Vec<CellValue>>, ImportError> {
                Ok(vec![
                    vec![
                        CellValue::Text("Address".into()),
                        CellValue::Text("Lat".into()),
                        CellValue::Text("Lng".into()),
                    ],
                    vec![
                        CellValue::Text("Origem".into()),
                        CellValue::Number(0.0),
                        CellValue::Number(0.0),
                    ],
                    vec![
                        CellValue::Text("Longe".into()),
                        CellValue::Number(10.0),
                        CellValue::Number(10.0),
                    ],
                    vec![
                        CellValue::Text("Perto".into()),
                        CellValue::Number(1.0),
                        CellValue::Number(1.0),
                    ],
                ])
            }
        }
        vm.importar_planilha(&GridGeo).await;
        while eventos.try_recv().is_ok() {}

        vm.optimize_route().await;

        let state = vm.ui_state();
        let orden: Vec<&str> = state.paradas.iter().map(|p| p.endereco.as_str()).collect();
        assert_eq!(orden, vec!["Origem", "Perto", "Longe"]);
        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage("Rota reotimizada!".to_string())
        );

        // el orden nuevo quedó persistido en la ruta activa
        let rota = state.rota_ativa.unwrap();
        assert_eq!(rota.paradas[1].endereco, "Perto");
    }

    #[tokio::test]
    async fn can_copy_stops_with_fresh_identities() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;
        vm.adicionar_parada("A").await;
        vm.adicionar_parada("B").await;

        let ids_origen: Vec<String> =
            vm.ui_state().paradas.iter().map(|p| p.id.clone()).collect();
        vm.atualizar_status_parada(&ids_origen[1], StatusParada::Entregue).await;
        while eventos.try_recv().is_ok() {}

        let destino = Rota::new("Destino");
        vm.repo.save_rota(&destino).unwrap();

        vm.copy_stops_to_route(&destino).await;

        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage(format!("Paradas copiadas para {}", destino.nome))
        );

        let guardada = vm.repo.get_rota_by_id(&destino.id).unwrap().unwrap();
        assert_eq!(guardada.paradas.len(), 2);
        for copia in &guardada.paradas {
            assert_eq!(copia.status, StatusParada::Pendente);
            assert!(!ids_origen.contains(&copia.id));
        }

        // la ruta de origen no se tocó
        let origen = vm.ui_state();
        assert_eq!(origen.paradas[1].id, ids_origen[1]);
        assert_eq!(origen.paradas[1].status, StatusParada::Entregue);
    }

    #[tokio::test]
    async fn can_report_empty_route_on_copy() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;

        let destino = Rota::new("Destino");
        vm.copy_stops_to_route(&destino).await;

        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage("Rota atual não tem paradas para copiar.".to_string())
        );
    }

    #[tokio::test]
    async fn can_order_copy_candidates_with_active_route_first() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();

        // dos rutas previas en el storage, después la activa
        let otra_a = Rota::new("Otra A");
        let otra_b = Rota::new("Otra B");
        vm.repo.save_rota(&otra_a).unwrap();
        vm.repo.save_rota(&otra_b).unwrap();
        vm.iniciar_nova_rota().await; // adopta "Otra A" (primera guardada)

        vm.load_routes_for_copy().await;

        match siguiente_mensaje(&mut eventos) {
            RouteUiEvent::ShowCopyDialog(rotas) => {
                assert_eq!(rotas.len(), 2);
                assert_eq!(rotas[0].id, otra_a.id); // activa primero
                assert_eq!(rotas[1].id, otra_b.id); // el resto, orden estable
            }
            otro => panic!("se esperaba ShowCopyDialog, llegó {:?}", otro),
        }
    }

    #[tokio::test]
    async fn can_share_and_print_route_files() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;

        // vacía: no-op informativo
        vm.share_route().await;
        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage("Rota vazia, nada para compartilhar.".to_string())
        );

        vm.adicionar_parada("Rua A, 100").await;
        vm.adicionar_parada("Rua B, 200").await;
        while eventos.try_recv().is_ok() {}

        vm.share_route().await;
        match siguiente_mensaje(&mut eventos) {
            RouteUiEvent::ShareFile(uri) => assert!(uri.contains("rota_compartilhada.txt")),
            otro => panic!("se esperaba ShareFile, llegó {:?}", otro),
        }

        vm.print_route().await;
        match siguiente_mensaje(&mut eventos) {
            RouteUiEvent::PrintFile(uri) => assert!(uri.contains("rota_impressao.txt")),
            otro => panic!("se esperaba PrintFile, llegó {:?}", otro),
        }
    }

    #[tokio::test]
    async fn can_open_remove_dialog_with_candidates() {
        let vm = viewmodel();
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;

        vm.open_remove_dialog();
        assert_eq!(
            siguiente_mensaje(&mut eventos),
            RouteUiEvent::ShowMessage("Nenhuma parada para remover.".to_string())
        );

        vm.adicionar_parada("Rua A").await;
        while eventos.try_recv().is_ok() {}

        vm.open_remove_dialog();
        match siguiente_mensaje(&mut eventos) {
            RouteUiEvent::ShowRemoveDialog(paradas) => assert_eq!(paradas.len(), 1),
            otro => panic!("se esperaba ShowRemoveDialog, llegó {:?}", otro),
        }
    }

    #[tokio::test]
    async fn can_surface_persistence_failure_without_rollback() {
        /// Store que acepta la primera escritura (creación de la ruta) y
        /// falla todas las siguientes
        struct StoreConFallo {
            inner: MemoryStore,
            escrituras: std::sync::atomic::AtomicUsize,
        }
        impl KeyValueStore for StoreConFallo {
            fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
                self.inner.get(key)
            }
            fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
                let n = self.escrituras.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                if n == 0 {
                    self.inner.set(key, value)
                } else {
                    Err(StorageError::Backend("disco lleno".to_string()))
                }
            }
            fn remove(&self, key: &str) -> Result<(), StorageError> {
                self.inner.remove(key)
            }
        }

        let vm = viewmodel_con_store(Arc::new(StoreConFallo {
            inner: MemoryStore::new(),
            escrituras: std::sync::atomic::AtomicUsize::new(0),
        }));
        let mut eventos = vm.take_events().unwrap();
        vm.iniciar_nova_rota().await;

        vm.adicionar_parada("Rua A").await;

        let state = vm.ui_state();
        // el cambio en memoria queda aplicado aunque el guardado haya fallado
        assert_eq!(state.paradas.len(), 1);
        assert!(state.erro.as_deref().unwrap().contains("disco lleno"));
        assert!(matches!(siguiente_mensaje(&mut eventos), RouteUiEvent::ShowError(_)));
    }
}
