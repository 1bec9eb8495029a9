//! # Connectivity
//!
//! Decides whether the client should skip the network entirely.
//!
//! ```text
//! offline  ⇐  !online  ∨  packaged  ∨  static_deployment
//! ```
//!
//! - **online**: the platform's network reachability flag
//! - **packaged**: running inside a mobile/desktop bundle, which never
//!   ships with the API server
//! - **static_deployment**: served from a static host with no backend
//!
//! Flags are atomics so a reachability watcher can flip them while requests
//! are in flight.

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::Url;

/// Hosts known to serve the UI statically, without an API behind it.
const STATIC_HOST_MARKERS: &[&str] = &["netlify"];

#[derive(Debug)]
pub struct Connectivity {
    online: AtomicBool,
    packaged: AtomicBool,
    static_deployment: AtomicBool,
}

impl Connectivity {
    /// Online, not packaged, not a static deployment.
    pub fn online() -> Self {
        Connectivity {
            online: AtomicBool::new(true),
            packaged: AtomicBool::new(false),
            static_deployment: AtomicBool::new(false),
        }
    }

    /// Reachability reported as down.
    pub fn offline() -> Self {
        let connectivity = Connectivity::online();
        connectivity.set_online(false);
        connectivity
    }

    /// Flags derived from the origin the UI is served from.
    pub fn for_origin(origin: &str) -> Self {
        let connectivity = Connectivity::online();
        connectivity.set_static_deployment(is_static_deployment(origin));
        connectivity
    }

    pub fn is_offline(&self) -> bool {
        !self.online.load(Ordering::SeqCst)
            || self.packaged.load(Ordering::SeqCst)
            || self.static_deployment.load(Ordering::SeqCst)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn set_packaged(&self, packaged: bool) {
        self.packaged.store(packaged, Ordering::SeqCst);
    }

    pub fn set_static_deployment(&self, static_deployment: bool) {
        self.static_deployment.store(static_deployment, Ordering::SeqCst);
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Connectivity::online()
    }
}

/// An HTTPS origin on a known static host.
pub fn is_static_deployment(origin: &str) -> bool {
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    url.scheme() == "https"
        && url
            .host_str()
            .is_some_and(|host| STATIC_HOST_MARKERS.iter().any(|marker| host.contains(marker)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_flag_makes_offline() {
        let c = Connectivity::online();
        assert!(!c.is_offline());

        c.set_online(false);
        assert!(c.is_offline());
        c.set_online(true);

        c.set_packaged(true);
        assert!(c.is_offline());
        c.set_packaged(false);

        c.set_static_deployment(true);
        assert!(c.is_offline());
    }

    #[test]
    fn test_static_deployment_detection() {
        assert!(is_static_deployment("https://droguerie-jamal.netlify.app"));
        assert!(!is_static_deployment("http://droguerie-jamal.netlify.app"));
        assert!(!is_static_deployment("https://stock.droguerie-jamal.ma"));
        assert!(!is_static_deployment("garbage"));

        assert!(Connectivity::for_origin("https://x.netlify.app").is_offline());
        assert!(Connectivity::offline().is_offline());
    }
}
