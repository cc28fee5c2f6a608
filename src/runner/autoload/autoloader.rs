use std::rc::Rc;

use tracing::{debug, debug_span};
use uuid::Uuid;

use crate::runner::autoload::chain::LoadingStack;
use crate::runner::autoload::handlers::HandlerChain;
use crate::runner::autoload::loader::LoadResult;
use crate::runner::autoload::map::ResolutionMap;
use crate::runner::autoload::runtime::{ExistsCheck, Runtime};
use crate::runner::ds::error::{AutoloadError, Miss};
use crate::runner::ds::symbol::{is_valid_class_name, normalize_ns, strip_inout_suffix, SymbolKind};

/// Autoloading state for one request.
///
/// Create one when a request starts and drop it when the request ends.
/// Nothing in it is shared between requests.
///
/// ## Resolution order for classes
///
/// 1. The resolution map, if one was installed with [`Autoloader::set_map`],
///    retried through the map's failure callback.
/// 2. The handler chain registered with [`Autoloader::add_handler`], or the
///    magic autoload function if nothing was ever registered.
///
/// Functions, constants, type aliases and records only ever use the map.
pub struct Autoloader {
    request_id: Uuid,
    pub(crate) runtime: Rc<dyn Runtime>,
    pub(crate) map: Option<ResolutionMap>,
    pub(crate) map_root: String,
    pub(crate) loading: LoadingStack,
    pub(crate) handlers: HandlerChain,
}

impl Autoloader {
    pub fn new(runtime: Rc<dyn Runtime>) -> Self {
        let request_id = Uuid::new_v4();
        debug!(request = %request_id, "autoload request started");
        Autoloader {
            request_id,
            runtime,
            map: None,
            map_root: String::new(),
            loading: LoadingStack::new(),
            handlers: HandlerChain::new(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Installs the resolution map, replacing any earlier one. Relative
    /// paths in the map get `root` prepended verbatim.
    pub fn set_map(&mut self, map: ResolutionMap, root: impl Into<String>) -> bool {
        self.map_root = root.into();
        debug!(
            request = %self.request_id,
            root = %self.map_root,
            failure_callback = map.failure_callback().is_some(),
            "autoload map installed"
        );
        self.map = Some(map);
        true
    }

    pub fn map(&self) -> Option<&ResolutionMap> {
        self.map.as_ref()
    }

    pub fn root(&self) -> &str {
        &self.map_root
    }

    /// True while any class is being resolved through the handler chain.
    pub fn is_running(&self) -> bool {
        !self.loading.is_empty()
    }

    pub fn handler_chain(&self) -> &HandlerChain {
        &self.handlers
    }

    /// Dispatches to the entry point for `kind`.
    pub fn autoload(&mut self, kind: SymbolKind, name: &str) -> Result<bool, AutoloadError> {
        match kind {
            SymbolKind::Class => self.autoload_class(name, false),
            SymbolKind::Function => self.autoload_function(name),
            SymbolKind::Constant => self.autoload_constant(name),
            SymbolKind::Type => self.autoload_type(name),
            SymbolKind::Record => self.autoload_record(name),
        }
    }

    pub fn autoload_class(&mut self, name: &str, force_reentrant: bool) -> Result<bool, AutoloadError> {
        if name.is_empty() {
            return Ok(false);
        }
        let class_name = normalize_ns(name);
        if !is_valid_class_name(class_name) {
            debug!(name = ?class_name, miss = %Miss::InvalidName, "refusing to autoload class");
            return Ok(false);
        }
        let _span = debug_span!("autoload_class", name = class_name, force_reentrant).entered();

        if self.map.is_some() {
            let check = ExistsCheck::Class(class_name);
            let result = self.load_with_retry(class_name, SymbolKind::Class, true, check)?;
            if result == LoadResult::Success || check.holds(&*self.runtime) {
                return Ok(true);
            }
            if result == LoadResult::StopAutoloading {
                return Ok(false);
            }
        }
        self.autoload_class_legacy(class_name, force_reentrant)
    }

    pub fn autoload_function(&mut self, name: &str) -> Result<bool, AutoloadError> {
        self.autoload_from_map(
            strip_inout_suffix(name),
            SymbolKind::Function,
            ExistsCheck::Function(name),
        )
    }

    pub fn autoload_constant(&mut self, name: &str) -> Result<bool, AutoloadError> {
        self.autoload_from_map(name, SymbolKind::Constant, ExistsCheck::Constant(name))
    }

    pub fn autoload_type(&mut self, name: &str) -> Result<bool, AutoloadError> {
        self.autoload_from_map(name, SymbolKind::Type, ExistsCheck::Type(name))
    }

    pub fn autoload_record(&mut self, name: &str) -> Result<bool, AutoloadError> {
        if name.is_empty() {
            return Ok(false);
        }
        self.autoload_from_map(name, SymbolKind::Record, ExistsCheck::Record(name))
    }

    /// Map-only kinds count anything but a plain `Failure` as handled.
    fn autoload_from_map(
        &mut self,
        name: &str,
        kind: SymbolKind,
        check: ExistsCheck<'_>,
    ) -> Result<bool, AutoloadError> {
        if self.map.is_none() {
            return Ok(false);
        }
        let _span = debug_span!("autoload", %kind, name).entered();
        let result = self.load_with_retry(name, kind, kind.folds_case(), check)?;
        Ok(result != LoadResult::Failure)
    }
}

impl Drop for Autoloader {
    fn drop(&mut self) {
        debug!(
            request = %self.request_id,
            handlers = self.handlers.len(),
            "autoload request finished"
        );
    }
}
