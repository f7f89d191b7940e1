//! Route tree and resolution
//!
//! Nodes are tried in declaration order and the first match wins. A guarded
//! branch owns every path under its prefix: its guard runs before any child
//! is considered, and once the guard allows, a path no child matches is a
//! `NotFound` rather than falling through to later siblings.

use serde::Serialize;

use super::path::{normalize, split_path, PathPattern};
use super::{Layout, Page, Params};
use crate::auth::{Guard, GuardOutcome, Role};
use crate::session::Session;

/// A node in the route tree
#[derive(Debug, Clone)]
pub struct RouteNode {
    pattern: PathPattern,
    kind: RouteKind,
}

#[derive(Debug, Clone)]
enum RouteKind {
    /// Leaf matching its pattern exactly
    Page(Page),
    /// Leaf matching when the parent path matched exactly
    Index(Page),
    /// Interior node composing its pattern with its children's
    Branch {
        guard: Option<Guard>,
        layout: Option<Layout>,
        children: Vec<RouteNode>,
    },
}

impl RouteNode {
    pub fn page(path: &'static str, page: Page) -> Self {
        Self {
            pattern: PathPattern::parse(path),
            kind: RouteKind::Page(page),
        }
    }

    pub fn index(page: Page) -> Self {
        Self {
            pattern: PathPattern::default(),
            kind: RouteKind::Index(page),
        }
    }

    pub fn branch(path: &'static str, children: Vec<RouteNode>) -> Self {
        Self {
            pattern: PathPattern::parse(path),
            kind: RouteKind::Branch {
                guard: None,
                layout: None,
                children,
            },
        }
    }

    /// Require `role` for everything under this branch
    ///
    /// Has no effect on leaf nodes.
    pub fn guarded(mut self, role: Role) -> Self {
        if let RouteKind::Branch { guard, .. } = &mut self.kind {
            *guard = Some(Guard::new(role));
        }
        self
    }

    /// Wrap every page under this branch in `layout`
    pub fn with_layout(mut self, chrome: Layout) -> Self {
        if let RouteKind::Branch { layout, .. } = &mut self.kind {
            *layout = Some(chrome);
        }
        self
    }
}

/// Outcome of resolving a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Navigation {
    /// Mount a page
    Render(RouteMatch),
    /// A guard refused entry
    Redirect(Redirect),
    /// No route matches
    NotFound { path: String },
}

impl Navigation {
    pub fn page(&self) -> Option<Page> {
        match self {
            Navigation::Render(m) => Some(m.page),
            _ => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Navigation::Redirect(r) => Some(r.to),
            _ => None,
        }
    }
}

/// A matched page with its captured params and enclosing layouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub page: Page,
    pub path: String,
    pub params: Params,
    /// Outermost first
    pub layouts: Vec<Layout>,
}

/// Redirect issued by a guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: &'static str,
    pub reason: GuardOutcome,
    pub required: Role,
}

/// A declared route, flattened for listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: String,
    pub page: Page,
    /// Role enforced by the nearest guarded ancestor
    pub required: Option<Role>,
    pub layouts: Vec<Layout>,
}

/// Resolve `path` against `routes` for `session`
pub fn resolve(routes: &[RouteNode], path: &str, session: &Session) -> Navigation {
    let segments = split_path(path);
    let mut scope = Scope {
        session,
        path: normalize(path),
        params: Params::new(),
        layouts: Vec::new(),
    };

    resolve_nodes(routes, &segments, &mut scope).unwrap_or_else(|| Navigation::NotFound {
        path: scope.path.clone(),
    })
}

/// State accumulated while descending the tree
struct Scope<'a> {
    session: &'a Session,
    path: String,
    params: Params,
    layouts: Vec<Layout>,
}

impl Scope<'_> {
    fn render(&self, page: Page, params: Params) -> Navigation {
        let mut all = self.params.clone();
        all.extend(params);
        Navigation::Render(RouteMatch {
            page,
            path: self.path.clone(),
            params: all,
            layouts: self.layouts.clone(),
        })
    }
}

fn resolve_nodes(nodes: &[RouteNode], segments: &[&str], scope: &mut Scope<'_>) -> Option<Navigation> {
    for node in nodes {
        match &node.kind {
            RouteKind::Page(page) => {
                if let Some(params) = node.pattern.match_exact(segments) {
                    return Some(scope.render(*page, params));
                }
            }
            RouteKind::Index(page) => {
                if segments.is_empty() {
                    return Some(scope.render(*page, Params::new()));
                }
            }
            RouteKind::Branch {
                guard,
                layout,
                children,
            } => {
                let Some((params, consumed)) = node.pattern.match_prefix(segments) else {
                    continue;
                };

                if let Some(guard) = guard {
                    let outcome = guard.check(scope.session);
                    if let Some(to) = outcome.redirect_path() {
                        tracing::debug!(
                            path = %scope.path,
                            required = %guard.required,
                            outcome = ?outcome,
                            redirect = %to,
                            "Guard redirected navigation"
                        );
                        return Some(Navigation::Redirect(Redirect {
                            to,
                            reason: outcome,
                            required: guard.required,
                        }));
                    }
                }

                let saved_params = scope.params.clone();
                let saved_layouts = scope.layouts.len();
                scope.params.extend(params);
                scope.layouts.extend(*layout);

                if let Some(nav) = resolve_nodes(children, &segments[consumed..], scope) {
                    return Some(nav);
                }

                scope.params = saved_params;
                scope.layouts.truncate(saved_layouts);

                if guard.is_some() {
                    return Some(Navigation::NotFound {
                        path: scope.path.clone(),
                    });
                }
            }
        }
    }

    None
}

/// Flatten `routes` into one entry per reachable page
pub fn entries(routes: &[RouteNode]) -> Vec<RouteEntry> {
    let mut out = Vec::new();
    collect_entries(routes, "", None, &mut Vec::new(), &mut out);
    out
}

fn collect_entries(
    nodes: &[RouteNode],
    prefix: &str,
    required: Option<Role>,
    layouts: &mut Vec<Layout>,
    out: &mut Vec<RouteEntry>,
) {
    for node in nodes {
        let path = join(prefix, &node.pattern.display());
        match &node.kind {
            RouteKind::Page(page) | RouteKind::Index(page) => out.push(RouteEntry {
                path: if path.is_empty() { "/".to_string() } else { path },
                page: *page,
                required,
                layouts: layouts.clone(),
            }),
            RouteKind::Branch {
                guard,
                layout,
                children,
            } => {
                let depth = layouts.len();
                layouts.extend(*layout);
                let required = guard.map(|g| g.required).or(required);
                collect_entries(children, &path, required, layouts, out);
                layouts.truncate(depth);
            }
        }
    }
}

fn join(prefix: &str, relative: &str) -> String {
    if relative.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, relative)
    }
}
