//! Which screen a path shows, given the session state.

/// A screen of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Dashboard,
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(View),
    Redirect(&'static str),
}

pub const LANDING: &str = "/";

/// Signed-out users only see `/login` and `/register`; signed-in users are
/// sent to `/dashboard` from those and from the landing route.
pub fn resolve(path: &str, authenticated: bool) -> Navigation {
    let path = match path.trim_end_matches('/') {
        "" => LANDING,
        trimmed => trimmed,
    };

    match (path, authenticated) {
        ("/login", false) => Navigation::Render(View::Login),
        ("/register", false) => Navigation::Render(View::Register),
        ("/dashboard", true) => Navigation::Render(View::Dashboard),
        ("/login" | "/register" | LANDING, true) => Navigation::Redirect("/dashboard"),
        ("/dashboard" | LANDING, false) => Navigation::Redirect("/login"),
        _ => Navigation::Redirect(LANDING),
    }
}

/// Follow redirects until a view renders.
pub fn navigate(path: &str, authenticated: bool) -> View {
    let mut current = path;
    // Every chain ends within three hops: unknown -> landing -> login/dashboard.
    for _ in 0..3 {
        match resolve(current, authenticated) {
            Navigation::Render(view) => return view,
            Navigation::Redirect(next) => current = next,
        }
    }
    if authenticated {
        View::Dashboard
    } else {
        View::Login
    }
}
