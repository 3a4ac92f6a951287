//! Screen routing.

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    AddProject,
    ViewProjects,
    /// Detail view of one project, by backend ID
    ProjectDetail(String),
}

impl Route {
    /// Routes reachable from the tab bar, in display order.
    pub const TABS: [Route; 2] = [Route::AddProject, Route::ViewProjects];

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::AddProject => "Add Architectural Project",
            Route::ViewProjects => "Architectural Projects",
            Route::ProjectDetail(_) => "Project Details",
        }
    }

    /// Whether this route highlights the given tab.
    pub fn is_active_tab(&self, tab: &Route) -> bool {
        match (self, tab) {
            (Route::ProjectDetail(_), Route::ViewProjects) => true,
            _ => self == tab,
        }
    }
}

/// Anything that can be asked to move to another route.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Current route plus a back stack.
#[derive(Debug)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    /// Start at the add-project screen when a session exists, else at login.
    pub fn for_session(authenticated: bool) -> Self {
        let current = if authenticated {
            Route::AddProject
        } else {
            Route::Login
        };
        Self {
            current,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Return to the previous route; stays put when there is none.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(route) => {
                self.current = route;
                true
            }
            None => false,
        }
    }

    /// Jump to a route and forget the back stack.
    pub fn reset(&mut self, route: Route) {
        self.history.clear();
        self.current = route;
    }
}

impl Navigator for Router {
    fn navigate(&mut self, route: Route) {
        if route == self.current {
            return;
        }
        let previous = std::mem::replace(&mut self.current, route);
        self.history.push(previous);
    }
}
