use super::route_map::RouteMap;
use super::KNOWN_METHODS;

use crate::tree::{validate, Leaf, LeafId, Params, RouterError, Tree};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

pub use http::Method;
use smallvec::SmallVec;
use tracing::{debug, trace};

const ANY: &str = "*";
const OPTIONAL: char = '?';

type Methods = SmallVec<[Method; 8]>;

/// Method-aware router: one [`Tree`] per HTTP method plus a ledger of every
/// registered pattern.
///
/// Routes are registered through `&mut self`. The first lookup seals the
/// router and any later registration is a configuration error.
#[derive(Debug)]
pub struct HttpRouter<T> {
    trees: HashMap<Method, Tree<usize>>,
    handlers: Vec<T>,
    route_map: RouteMap,
    registrations: Vec<Registration>,
    named: HashMap<Box<str>, (Method, Box<str>)>,
    prefixes: Vec<String>,
    last: Option<(Method, Box<str>)>,
    auto_head: bool,
    sealed: AtomicBool,
}

#[derive(Debug)]
struct Registration {
    method: Method,
    pattern: Box<str>,
    handler: usize,
}

/// A registered route: its handler and the leaf it terminates at.
#[derive(Debug)]
pub struct Route<'r, T> {
    leaf: Leaf<'r, usize>,
    handler: &'r T,
}

impl<'r, T> Route<'r, T> {
    pub fn handler(&self) -> &'r T {
        self.handler
    }

    pub fn leaf_id(&self) -> LeafId {
        self.leaf.id()
    }

    pub fn raw_pattern(&self) -> String {
        self.leaf.raw_pattern()
    }

    pub fn url_path(&self, pairs: &[(&str, &str)]) -> String {
        self.leaf.url_path(pairs)
    }

    pub fn try_url_path(&self, pairs: &[(&str, &str)]) -> Result<String, RouterError> {
        self.leaf.try_url_path(pairs)
    }
}

impl<T> HttpRouter<T> {
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
            handlers: Vec::new(),
            route_map: RouteMap::new(),
            registrations: Vec::new(),
            named: HashMap::new(),
            prefixes: Vec::new(),
            last: None,
            auto_head: false,
            sealed: AtomicBool::new(false),
        }
    }

    /// Registering a GET route also registers it for HEAD.
    pub fn set_auto_head(&mut self, enabled: bool) -> &mut Self {
        self.auto_head = enabled;
        self
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Registers `handler` for `method` (a verb or `"*"`) and `pattern`.
    ///
    /// Registering the same method and pattern again keeps the first handler.
    pub fn handle(&mut self, method: &str, pattern: &str, handler: T) -> &mut Self {
        if let Err(e) = self.try_handle(method, pattern, handler) {
            panic!("{}: pattern = {:?}", e, pattern);
        }
        self
    }

    pub fn try_handle(
        &mut self,
        method: &str,
        pattern: &str,
        handler: T,
    ) -> Result<&mut Self, RouterError> {
        if self.is_sealed() {
            return Err(RouterError::Sealed);
        }
        let methods = parse_methods(method)?;
        let pattern = self.prefixed(pattern);
        self.register(&methods, &pattern, Some(handler), None)?;
        Ok(self)
    }

    /// Registers every route made inside `f` under `prefix`.
    pub fn group(&mut self, prefix: &str, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.prefixes.push(prefix.to_owned());
        f(self);
        self.prefixes.pop();
        self
    }

    pub fn insert_router(&mut self, prefix: &str, router: HttpRouter<T>) -> &mut Self {
        if let Err(e) = self.try_insert_router(prefix, router) {
            panic!("{}: pattern = {:?}", e, prefix);
        }
        self
    }

    /// Moves every route of `router` into `self` under `prefix`.
    pub fn try_insert_router(
        &mut self,
        prefix: &str,
        router: HttpRouter<T>,
    ) -> Result<&mut Self, RouterError> {
        if self.is_sealed() {
            return Err(RouterError::Sealed);
        }
        let HttpRouter {
            handlers,
            registrations,
            named,
            ..
        } = router;

        let prefix = self.prefixed(prefix);
        let registrations = registrations
            .into_iter()
            .map(|reg| -> Result<_, RouterError> {
                let pattern = join_prefix(&prefix, &reg.pattern);
                validate(&pattern)?;
                Ok((reg.method, pattern, reg.handler))
            })
            .collect::<Result<Vec<_>, RouterError>>()?;

        let base = self.handlers.len();
        self.handlers.extend(handlers);

        for (method, pattern, handler) in registrations {
            let methods: Methods = std::iter::once(method).collect();
            self.register(&methods, &pattern, None, Some(base + handler))?;
        }
        for (name, (method, pattern)) in named {
            let pattern = join_prefix(&prefix, &pattern).into_boxed_str();
            self.named.entry(name).or_insert((method, pattern));
        }
        Ok(self)
    }

    /// Names the most recently registered route for [`HttpRouter::url_for`].
    pub fn name(&mut self, name: &str) -> &mut Self {
        if let Err(e) = self.try_name(name) {
            panic!("{}", e);
        }
        self
    }

    pub fn try_name(&mut self, name: &str) -> Result<&mut Self, RouterError> {
        let last = self.last.clone().ok_or(RouterError::NoRouteToName)?;
        if name.is_empty() {
            return Err(RouterError::EmptyRouteName);
        }
        if self.named.contains_key(name) {
            return Err(RouterError::DuplicateRouteName(name.to_owned()));
        }
        self.named.insert(name.into(), last);
        Ok(self)
    }

    pub fn url_for(&self, name: &str, pairs: &[(&str, &str)]) -> String {
        match self.try_url_for(name, pairs) {
            Ok(url) => url,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_url_for(&self, name: &str, pairs: &[(&str, &str)]) -> Result<String, RouterError> {
        let (method, pattern) = self
            .named
            .get(name)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_owned()))?;
        let route = self
            .get_route(method, pattern)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_owned()))?;
        route.try_url_path(pairs)
    }

    /// Looks up a route by the literal pattern it was registered with.
    pub fn get_route(&self, method: &Method, pattern: &str) -> Option<Route<'_, T>> {
        let leaf = self.route_map.get(method, pattern)?;
        let leaf = self.trees.get(method)?.leaf(leaf)?;
        Some(self.to_route(leaf))
    }

    /// Matches an escaped request path and returns the handler with its
    /// captured parameters.
    pub fn find(&self, method: &Method, path: &str) -> Option<(&T, Params)> {
        let (route, params) = self.find_route(method, path)?;
        Some((route.handler, params))
    }

    pub fn find_route(&self, method: &Method, path: &str) -> Option<(Route<'_, T>, Params)> {
        self.seal();
        let tree = self.trees.get(method)?;

        if is_literal(path) {
            if let Some(id) = self.route_map.get(method, path) {
                trace!(%method, path, "static route hit");
                let leaf = tree.leaf(id)?;
                return Some((self.to_route(leaf), Params::default()));
            }
        }

        let (leaf, params) = tree.find(path)?;
        Some((self.to_route(leaf), params))
    }
}

impl<T> HttpRouter<T> {
    fn seal(&self) {
        if !self.sealed.load(Ordering::Relaxed) {
            self.sealed.store(true, Ordering::Release);
        }
    }

    fn to_route<'r>(&'r self, leaf: Leaf<'r, usize>) -> Route<'r, T> {
        Route {
            handler: &self.handlers[*leaf.data()],
            leaf,
        }
    }

    fn prefixed(&self, pattern: &str) -> String {
        join_prefix(&self.prefixes.concat(), pattern)
    }

    /// Inserts `pattern` into the tree of every method that does not hold it
    /// yet. A new `handler` value is stored only if some method takes it.
    /// An invalid pattern is rejected before any state changes.
    fn register(
        &mut self,
        methods: &[Method],
        pattern: &str,
        handler: Option<T>,
        existing: Option<usize>,
    ) -> Result<(), RouterError> {
        validate(pattern)?;

        let mut methods: Methods = methods.iter().cloned().collect();
        if self.auto_head && methods.contains(&Method::GET) && !methods.contains(&Method::HEAD) {
            methods.push(Method::HEAD);
        }

        if let Some(first) = methods.first() {
            self.last = Some((first.clone(), pattern.into()));
        }

        let fresh: Methods = methods
            .into_iter()
            .filter(|m| {
                let taken = self.route_map.contains(m, pattern);
                if taken {
                    debug!(method = %m, pattern, "duplicate route ignored");
                }
                !taken
            })
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }

        let index = match (existing, handler) {
            (Some(index), _) => index,
            (None, Some(handler)) => {
                self.handlers.push(handler);
                self.handlers.len() - 1
            }
            (None, None) => return Ok(()),
        };

        for method in fresh {
            let tree = self.trees.entry(method.clone()).or_insert_with(Tree::new);
            let leaf = tree.try_insert(pattern, index)?;
            self.route_map.add(&method, pattern, leaf);
            debug!(method = %method, pattern, "route registered");
            self.registrations.push(Registration {
                method,
                pattern: pattern.into(),
                handler: index,
            });
        }
        Ok(())
    }
}

impl<T> Default for HttpRouter<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_methods(method: &str) -> Result<Methods, RouterError> {
    if method == ANY {
        return Ok(KNOWN_METHODS.iter().cloned().collect());
    }
    let upper = method.to_ascii_uppercase();
    KNOWN_METHODS
        .iter()
        .find(|m| m.as_str() == upper)
        .map(|m| std::iter::once(m.clone()).collect())
        .ok_or_else(|| RouterError::UnknownMethod(method.to_owned()))
}

/// Joins `prefix` and `pattern`, keeping a whole-pattern `?` in front.
fn join_prefix(prefix: &str, pattern: &str) -> String {
    if pattern.starts_with(OPTIONAL) {
        format!("{}{}{}", OPTIONAL, prefix, &pattern[1..])
    } else {
        format!("{}{}", prefix, pattern)
    }
}

#[inline]
fn is_literal(path: &str) -> bool {
    !path.contains(|c| matches!(c, ':' | '*' | '%'))
}

macro_rules! define_method {
    ($name:ident, $method:expr) => {
        pub fn $name(&mut self, pattern: &str, handler: T) -> &mut Self {
            self.handle($method, pattern, handler)
        }
    };
}

impl<T> HttpRouter<T> {
    define_method!(get, "GET");
    define_method!(post, "POST");
    define_method!(put, "PUT");
    define_method!(delete, "DELETE");
    define_method!(patch, "PATCH");
    define_method!(head, "HEAD");
    define_method!(options, "OPTIONS");
    define_method!(any, ANY);
}
