//! Command dispatcher
//!
//! Routes named operations from the webview to record managers and host services.
//! Operations are registered once, on the first `initialize`; later calls only
//! rebind the window that dialogs attach to.

use futures_util::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use url::Url;

use shortcut_storage::{ConfigDocument, Project, QuickAccessSite};

use crate::bridge;
use crate::context::ShellContext;
use crate::envelope::{wrap, CommandResult};
use crate::error::CoreError;
use crate::host::HostShell;
use crate::record::{ProjectDraft, ProjectPatch, QuickAccessSiteDraft, QuickAccessSitePatch};
use crate::Result;

type Handler<H> =
    Arc<dyn Fn(Arc<ShellContext<H>>, Args) -> BoxFuture<'static, Value> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Uninitialized,
    Initialized,
}

/// Positional arguments of a call, as sent by the webview
#[derive(Debug, Clone, Default)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Decode argument `index`; a missing argument decodes from `null`
    pub fn decode<T: DeserializeOwned>(&self, index: usize, name: &str) -> Result<T> {
        let value = self.0.get(index).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| CoreError::InvalidArgument(format!("{name}: {e}")))
    }
}

pub struct CommandDispatcher<H: HostShell> {
    context: Arc<ShellContext<H>>,
    state: RwLock<DispatcherState>,
    handlers: RwLock<HashMap<&'static str, Handler<H>>>,
}

impl<H: HostShell> CommandDispatcher<H> {
    pub fn new(context: Arc<ShellContext<H>>) -> Self {
        Self {
            context,
            state: RwLock::new(DispatcherState::Uninitialized),
            handlers: RwLock::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &Arc<ShellContext<H>> {
        &self.context
    }

    pub fn state(&self) -> DispatcherState {
        *self.state.read()
    }

    /// Bind `window` and register every operation if this is the first call
    pub fn initialize(&self, window: H::Window) -> Result<()> {
        self.bind(window);

        let mut state = self.state.write();
        if *state == DispatcherState::Initialized {
            tracing::debug!("Dispatcher already initialized, window rebound");
            return Ok(());
        }

        self.register_all()?;
        *state = DispatcherState::Initialized;

        tracing::info!(
            operations = self.handlers.read().len(),
            "Registered IPC operations"
        );
        Ok(())
    }

    pub fn bind(&self, window: H::Window) {
        self.context.bind_window(window);
    }

    /// Register the full operation table. Fails if any name is already taken.
    pub fn register_all(&self) -> Result<()> {
        self.register_wrapped("get-config", get_config::<H>)?;
        self.register_wrapped("get-projects", get_projects::<H>)?;
        self.register_wrapped("add-project", add_project::<H>)?;
        self.register_wrapped("update-project", update_project::<H>)?;
        self.register_wrapped("delete-project", delete_project::<H>)?;
        self.register_wrapped("add-quick-access-site", add_quick_access_site::<H>)?;
        self.register_wrapped("update-quick-access-site", update_quick_access_site::<H>)?;
        self.register_wrapped("delete-quick-access-site", delete_quick_access_site::<H>)?;
        // Cancelling is an expected outcome, so the envelope is built by hand
        self.register("select-folder", |ctx, args| {
            select_folder(ctx, args)
                .map(CommandResult::into_value)
                .boxed()
        })?;
        self.register_wrapped("open-url", open_url::<H>)?;
        Ok(())
    }

    pub fn register<F>(&self, name: &'static str, handler: F) -> Result<()>
    where
        F: Fn(Arc<ShellContext<H>>, Args) -> BoxFuture<'static, Value> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write();
        if handlers.contains_key(name) {
            return Err(CoreError::DuplicateRegistration(name.to_string()));
        }
        handlers.insert(name, Arc::new(handler));
        Ok(())
    }

    fn register_wrapped<T, F, Fut>(&self, name: &'static str, handler: F) -> Result<()>
    where
        T: Serialize + Send + 'static,
        F: Fn(Arc<ShellContext<H>>, Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        self.register(name, move |ctx, args| {
            wrap(handler(ctx, args))
                .map(CommandResult::into_value)
                .boxed()
        })
    }

    pub fn registered_operations(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.read().keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run operation `name`. Always resolves to a serialized envelope.
    pub async fn dispatch(&self, name: &str, args: Vec<Value>) -> Value {
        if bridge::find(name).is_none() {
            tracing::warn!(operation = name, "Rejected call to unexposed operation");
            return CommandResult::<()>::err(format!("Operation '{name}' is not exposed"))
                .into_value();
        }

        let handler = self.handlers.read().get(name).cloned();
        let Some(handler) = handler else {
            return CommandResult::<()>::err(format!("No handler registered for '{name}'"))
                .into_value();
        };

        tracing::debug!(operation = name, "Dispatching operation");
        handler(Arc::clone(&self.context), Args::new(args)).await
    }
}

async fn get_config<H: HostShell>(
    ctx: Arc<ShellContext<H>>,
    _args: Args,
) -> Result<ConfigDocument> {
    Ok(ctx.store().load())
}

async fn get_projects<H: HostShell>(
    ctx: Arc<ShellContext<H>>,
    _args: Args,
) -> Result<Vec<Project>> {
    Ok(ctx.projects().list())
}

async fn add_project<H: HostShell>(ctx: Arc<ShellContext<H>>, args: Args) -> Result<Project> {
    let draft: ProjectDraft = args.decode(0, "project")?;
    ctx.projects().add(draft)
}

async fn update_project<H: HostShell>(ctx: Arc<ShellContext<H>>, args: Args) -> Result<Project> {
    let id: String = args.decode(0, "id")?;
    let patch: ProjectPatch = args.decode(1, "updates")?;
    ctx.projects().update(&id, patch)
}

async fn delete_project<H: HostShell>(ctx: Arc<ShellContext<H>>, args: Args) -> Result<bool> {
    let id: String = args.decode(0, "id")?;
    ctx.projects().delete(&id)
}

async fn add_quick_access_site<H: HostShell>(
    ctx: Arc<ShellContext<H>>,
    args: Args,
) -> Result<QuickAccessSite> {
    let draft: QuickAccessSiteDraft = args.decode(0, "site")?;
    ctx.quick_access_sites().add(draft)
}

async fn update_quick_access_site<H: HostShell>(
    ctx: Arc<ShellContext<H>>,
    args: Args,
) -> Result<QuickAccessSite> {
    let id: String = args.decode(0, "id")?;
    let patch: QuickAccessSitePatch = args.decode(1, "updates")?;
    ctx.quick_access_sites().update(&id, patch)
}

async fn delete_quick_access_site<H: HostShell>(
    ctx: Arc<ShellContext<H>>,
    args: Args,
) -> Result<bool> {
    let id: String = args.decode(0, "id")?;
    ctx.quick_access_sites().delete(&id)
}

async fn select_folder<H: HostShell>(
    ctx: Arc<ShellContext<H>>,
    _args: Args,
) -> CommandResult<String> {
    let Some(window) = ctx.window() else {
        return CommandResult::err(CoreError::NoWindow.to_string());
    };

    match ctx.host().pick_folder(&window).await {
        Ok(Some(path)) => CommandResult::ok(path.to_string_lossy().into_owned()),
        Ok(None) => CommandResult::err("No folder was selected".to_string()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

async fn open_url<H: HostShell>(ctx: Arc<ShellContext<H>>, args: Args) -> Result<bool> {
    let raw: String = args.decode(0, "url")?;
    let url = Url::parse(&raw).map_err(|e| CoreError::InvalidArgument(format!("url: {e}")))?;
    ctx.host().open_url(url.as_str()).await?;
    Ok(true)
}
