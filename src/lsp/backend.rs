use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use serde_json::Value;
use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, error, info, warn};

use crate::config::{LINT_DEBOUNCE_MS, LspConfig, SEARCH_RESULT_LIMIT};
use crate::icons::error::IconSetError;
use crate::icons::icon::IconCollection;
use crate::icons::manager::IconManager;
use crate::icons::variant::Variant;
use crate::lsp::code_action::search_code_actions;
use crate::lsp::completion::completion_list;
use crate::lsp::debounce::Debouncer;
use crate::lsp::diagnostics::generate_diagnostics;
use crate::lsp::hover::create_hover;
use crate::lsp::token::{partial_name_at, token_at};

pub const SEARCH_COMMAND: &str = "mdi.search";
pub const VERSIONS_COMMAND: &str = "mdi.versions";

#[derive(Debug, Clone)]
struct Document {
    text: String,
    language_id: String,
}

pub struct Backend {
    shared: Arc<Shared>,
    linter: Debouncer<Url>,
}

/// State reachable from debounced lint tasks
struct Shared {
    client: Client,
    manager: Arc<IconManager>,
    documents: RwLock<HashMap<Url, Document>>,
    workspace_roots: RwLock<Vec<PathBuf>>,
    reported_errors: Mutex<HashSet<String>>,
}

impl Backend {
    pub fn new(client: Client, manager: Arc<IconManager>) -> Self {
        Self {
            shared: Arc::new(Shared {
                client,
                manager,
                documents: RwLock::new(HashMap::new()),
                workspace_roots: RwLock::new(Vec::new()),
                reported_errors: Mutex::new(HashSet::new()),
            }),
            linter: Debouncer::new(Duration::from_millis(LINT_DEBOUNCE_MS)),
        }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    ..Default::default()
                },
            )),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
            completion_provider: Some(CompletionOptions {
                trigger_characters: Some(vec!["-".to_string(), ":".to_string()]),
                ..Default::default()
            }),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![SEARCH_COMMAND.to_string(), VERSIONS_COMMAND.to_string()],
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        }
    }

    fn schedule_lint(&self, uri: Url) {
        let shared = self.shared.clone();
        self.linter
            .schedule(uri.clone(), async move { shared.lint(uri).await });
    }

    fn apply_settings(&self, settings: Value) {
        match LspConfig::from_settings(settings) {
            Ok(config) => {
                info!("Configuration updated: {:?}", config);
                self.shared.manager.update_config(config);
            }
            Err(e) => warn!("Ignoring invalid configuration: {}", e),
        }
    }

    async fn execute_search(&self, arguments: &[Value]) -> Result<Option<Value>> {
        let Some(query) = arguments.first().and_then(Value::as_str) else {
            return Err(Error::invalid_params(format!(
                "{SEARCH_COMMAND} expects a query string"
            )));
        };

        let icons = self
            .shared
            .manager
            .search(query, SEARCH_RESULT_LIMIT)
            .await
            .map_err(rpc_error)?;

        let names: Vec<&str> = icons.iter().map(|icon| icon.name()).collect();
        Ok(Some(serde_json::json!(names)))
    }

    async fn execute_versions(&self) -> Result<Option<Value>> {
        let info = self
            .shared
            .manager
            .available_versions()
            .await
            .map_err(rpc_error)?;

        serde_json::to_value(info)
            .map(Some)
            .map_err(|_| Error::internal_error())
    }
}

impl Shared {
    fn document(&self, uri: &Url) -> Option<Document> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
            .cloned()
    }

    fn open_documents(&self) -> Vec<Url> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Icons for the active configuration; failures are reported to the
    /// user once per distinct message
    async fn icons(&self) -> Option<(Arc<IconCollection>, Variant)> {
        let config = self.manager.config();
        let variant = Variant::from_light(config.icons.light);

        match self
            .manager
            .icon_list_for(variant, config.icons.pinned_version())
            .await
        {
            Ok(collection) => Some((collection, variant)),
            Err(e) => {
                self.report_error(&e).await;
                None
            }
        }
    }

    async fn lint(&self, uri: Url) {
        let Some(document) = self.document(&uri) else {
            return;
        };

        let config = self.manager.config();
        let ignored = config.lint.ignores_path(&self.relative_path(&uri));
        if ignored || !config.lint.applies_to(&document.language_id) {
            self.client.publish_diagnostics(uri, vec![], None).await;
            return;
        }

        let Some((collection, variant)) = self.icons().await else {
            self.client.publish_diagnostics(uri, vec![], None).await;
            return;
        };

        let diagnostics =
            generate_diagnostics(&collection, variant, &config.lint, &document.text);

        self.client
            .log_message(
                MessageType::LOG,
                format!("Publishing {} diagnostics for {}", diagnostics.len(), uri),
            )
            .await;

        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    fn relative_path(&self, uri: &Url) -> String {
        let roots = self
            .workspace_roots
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        relative_path(uri, &roots)
    }

    async fn report_error(&self, e: &IconSetError) {
        let message = format!("MDI: {e}");
        error!("{}", message);

        let first_time = self
            .reported_errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(message.clone());
        if first_time {
            self.client.show_message(MessageType::WARNING, message).await;
        }
    }
}

/// Path of `uri` relative to the first workspace root containing it, using
/// `/` separators. Files outside every root keep their full path.
fn relative_path(uri: &Url, roots: &[PathBuf]) -> String {
    let Ok(path) = uri.to_file_path() else {
        return uri.path().to_string();
    };

    match roots.iter().find_map(|root| path.strip_prefix(root).ok()) {
        Some(relative) => relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        None => path.to_string_lossy().into_owned(),
    }
}

fn workspace_roots(params: &InitializeParams) -> Vec<PathBuf> {
    #[allow(deprecated)]
    let root_uri = params.root_uri.as_ref();

    params
        .workspace_folders
        .iter()
        .flatten()
        .map(|folder| &folder.uri)
        .chain(root_uri)
        .filter_map(|uri| uri.to_file_path().ok())
        .collect()
}

fn rpc_error(e: IconSetError) -> Error {
    error!("Command failed: {}", e);
    Error {
        code: ErrorCode::InternalError,
        message: e.to_string().into(),
        data: None,
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.shared
            .client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;

        *self
            .shared
            .workspace_roots
            .write()
            .unwrap_or_else(PoisonError::into_inner) = workspace_roots(&params);

        if let Some(options) = params.initialization_options {
            self.apply_settings(options);
        }

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "mdi-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.shared
            .client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;

        let manager = self.shared.manager.clone();
        let variant = manager.active_variant();
        tokio::spawn(async move {
            if let Err(e) = manager.refresh_latest(variant).await {
                warn!("Failed to refresh latest {} version: {}", variant, e);
            }
        });
    }

    async fn shutdown(&self) -> Result<()> {
        self.shared
            .client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri,
            language_id,
            text,
            ..
        } = params.text_document;
        debug!("Document opened: {} ({})", uri, language_id);

        self.shared
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uri.clone(), Document { text, language_id });

        self.schedule_lint(uri);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // With FULL sync mode, the last content change contains the full document text
        let Some(content) = params.content_changes.into_iter().last().map(|c| c.text) else {
            return;
        };
        let uri = params.text_document.uri;

        {
            let mut documents = self
                .shared
                .documents
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            match documents.get_mut(&uri) {
                Some(document) => document.text = content,
                None => {
                    documents.insert(
                        uri.clone(),
                        Document {
                            text: content,
                            language_id: String::new(),
                        },
                    );
                }
            }
        }

        self.schedule_lint(uri);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!("Document closed: {}", uri);

        self.linter.cancel(&uri);
        self.shared
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&uri);

        self.shared
            .client
            .publish_diagnostics(uri, vec![], None)
            .await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.apply_settings(params.settings);

        for uri in self.shared.open_documents() {
            self.schedule_lint(uri);
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let position = params.text_document_position_params.position;
        let uri = params.text_document_position_params.text_document.uri;

        let Some(document) = self.shared.document(&uri) else {
            return Ok(None);
        };
        let variant = self.shared.manager.active_variant();
        let Some(token) = token_at(&document.text, position, variant) else {
            return Ok(None);
        };
        let Some((collection, variant)) = self.shared.icons().await else {
            return Ok(None);
        };

        Ok(Some(create_hover(
            &token,
            collection.get(&token.name),
            variant,
        )))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position.position;
        let uri = params.text_document_position.text_document.uri;

        let Some(document) = self.shared.document(&uri) else {
            return Ok(None);
        };
        let variant = self.shared.manager.active_variant();
        let Some((_, range)) = partial_name_at(&document.text, position, variant) else {
            return Ok(None);
        };
        let Some((collection, variant)) = self.shared.icons().await else {
            return Ok(None);
        };

        let include_aliases = self.shared.manager.config().completion.include_aliases;
        Ok(Some(CompletionResponse::List(completion_list(
            &collection,
            variant,
            include_aliases,
            range,
        ))))
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let actions = search_code_actions(&params.context.diagnostics);
        debug!(
            "Offering {} code actions for {}",
            actions.len(),
            params.text_document.uri
        );
        Ok((!actions.is_empty()).then_some(actions))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        match params.command.as_str() {
            SEARCH_COMMAND => self.execute_search(&params.arguments).await,
            VERSIONS_COMMAND => self.execute_versions().await,
            other => Err(Error::invalid_params(format!("Unknown command: {other}"))),
        }
    }
}
