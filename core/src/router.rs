//! Path → view resolution for the two applications.
//!
//! A route table is a flat list of exact paths plus one redirect rule. There
//! are no guards, nested routes or dynamic segments.

use thiserror::Error;

/// The views a route can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    BooksList,
    BooksNew,
    TodoList,
    Profile,
    Contact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
}

impl Route {
    pub const fn new(path: &'static str, name: &'static str, view: View) -> Self {
        Self { path, name, view }
    }
}

/// `from` is answered by sending the client to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub from: &'static str,
    pub to: &'static str,
    pub name: Option<&'static str>,
}

impl Redirect {
    pub const fn new(from: &'static str, to: &'static str) -> Self {
        Self {
            from,
            to,
            name: None,
        }
    }

    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }
}

/// Outcome of [`Router::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    View(&'a Route),
    /// The path redirects; `route` is where it lands.
    Redirect { to: &'a str, route: &'a Route },
    NotFound,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("duplicate route path: {0}")]
    DuplicatePath(&'static str),

    #[error("redirect target {0} is not a declared route")]
    UnknownRedirectTarget(&'static str),
}

#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
    redirect: Redirect,
}

impl Router {
    pub fn new(routes: Vec<Route>, redirect: Redirect) -> Result<Self, RouteError> {
        for (i, route) in routes.iter().enumerate() {
            if routes[..i].iter().any(|earlier| earlier.path == route.path) {
                return Err(RouteError::DuplicatePath(route.path));
            }
        }
        if !routes.iter().any(|route| route.path == redirect.to) {
            return Err(RouteError::UnknownRedirectTarget(redirect.to));
        }
        Ok(Self { routes, redirect })
    }

    /// Routes of the book library: `/` redirects to the list.
    pub fn library() -> Self {
        Self {
            routes: vec![
                Route::new("/books", "books-list", View::BooksList),
                Route::new("/books/new", "books-new", View::BooksNew),
            ],
            redirect: Redirect::new("/", "/books"),
        }
    }

    /// Routes of the todo app: `/` redirects to the todo list.
    pub fn todo_app() -> Self {
        Self {
            routes: vec![
                Route::new("/todos", "todos", View::TodoList),
                Route::new("/profile", "profile", View::Profile),
                Route::new("/contact", "contact", View::Contact),
            ],
            redirect: Redirect::new("/", "/todos").named("home"),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn redirect(&self) -> &Redirect {
        &self.redirect
    }

    /// Resolve `path`, ignoring any query string, fragment and trailing
    /// slash.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        let path = normalize(path);
        if path == self.redirect.from {
            return match self.find(self.redirect.to) {
                Some(route) => Resolution::Redirect {
                    to: self.redirect.to,
                    route,
                },
                None => Resolution::NotFound,
            };
        }
        self.find(path).map_or(Resolution::NotFound, Resolution::View)
    }

    /// Look up a route by name. A named redirect yields the route it lands
    /// on.
    pub fn route_named(&self, name: &str) -> Option<&Route> {
        if self.redirect.name == Some(name) {
            return self.find(self.redirect.to);
        }
        self.routes.iter().find(|route| route.name == name)
    }

    fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.path == path)
    }
}

fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
