use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::session::{Role, Session};

/// The login view path, target of every unauthenticated navigation.
pub const LOGIN_PATH: &str = "/login";
/// The root path; dispatches by role and doubles as the unauthorized target.
pub const ROOT_PATH: &str = "/";

/// View
///
/// The closed set of shell views. The server never renders these itself; a
/// navigation that passes the guard answers with the view identifier and the
/// SPA mounts the matching page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum View {
    Login,
    Register,
    AdminDashboard,
    AdminAds,
    AdminVenues,
    AdminPayouts,
    VenueDashboard,
    VenueEarnings,
    VenuePayouts,
    AdvertiserDashboard,
    AdvertiserCampaigns,
    AdvertiserUpload,
    AdvertiserLocations,
}

/// RouteEntry
///
/// One row of the static route table. `required_roles: None` marks a public
/// view; `Some(roles)` marks a guarded one, where authentication is always
/// required and an empty slice admits any authenticated user.
#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
    pub path: &'static str,
    pub required_roles: Option<&'static [Role]>,
    pub view: View,
}

/// The route table. Defined once, never mutated; paths are unique and every
/// guarded entry names its role set explicitly. The HTTP layer registers its
/// navigation routes by iterating this same table, so the table is the single
/// source of truth for what the shell serves.
pub const ROUTE_TABLE: &[RouteEntry] = &[
    // Public
    RouteEntry {
        path: "/login",
        required_roles: None,
        view: View::Login,
    },
    RouteEntry {
        path: "/register",
        required_roles: None,
        view: View::Register,
    },
    // Admin
    RouteEntry {
        path: "/admin/dashboard",
        required_roles: Some(&[Role::Admin]),
        view: View::AdminDashboard,
    },
    RouteEntry {
        path: "/admin/ads",
        required_roles: Some(&[Role::Admin]),
        view: View::AdminAds,
    },
    RouteEntry {
        path: "/admin/venues",
        required_roles: Some(&[Role::Admin]),
        view: View::AdminVenues,
    },
    RouteEntry {
        path: "/admin/payouts",
        required_roles: Some(&[Role::Admin]),
        view: View::AdminPayouts,
    },
    // Venue
    RouteEntry {
        path: "/venue/dashboard",
        required_roles: Some(&[Role::Venue]),
        view: View::VenueDashboard,
    },
    RouteEntry {
        path: "/venue/earnings",
        required_roles: Some(&[Role::Venue]),
        view: View::VenueEarnings,
    },
    RouteEntry {
        path: "/venue/payouts",
        required_roles: Some(&[Role::Venue]),
        view: View::VenuePayouts,
    },
    // Advertiser
    RouteEntry {
        path: "/advertiser/dashboard",
        required_roles: Some(&[Role::Advertiser]),
        view: View::AdvertiserDashboard,
    },
    RouteEntry {
        path: "/advertiser/campaigns",
        required_roles: Some(&[Role::Advertiser]),
        view: View::AdvertiserCampaigns,
    },
    RouteEntry {
        path: "/advertiser/upload",
        required_roles: Some(&[Role::Advertiser]),
        view: View::AdvertiserUpload,
    },
    RouteEntry {
        path: "/advertiser/locations",
        required_roles: Some(&[Role::Advertiser]),
        view: View::AdvertiserLocations,
    },
];

/// Outcome
///
/// The result of dispatching one navigation: either render a view, or
/// redirect to another path. There is deliberately no error variant —
/// unauthorized navigation is a redirect, never a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Render(View),
    Redirect(&'static str),
}

/// find_route
///
/// Exact-match lookup in the route table.
pub fn find_route(path: &str) -> Option<&'static RouteEntry> {
    ROUTE_TABLE.iter().find(|entry| entry.path == path)
}

/// guard
///
/// The access guard. Given a guarded entry's role set and the current
/// session, returns `None` to admit the navigation or `Some(target)` to
/// redirect it:
/// 1. unauthenticated → the login view;
/// 2. role set non-empty and the session role is not in it → the root path;
/// 3. otherwise → admitted.
///
/// A session with no role (anonymous, or a role value outside the closed
/// enum) can never satisfy a non-empty role set.
pub fn guard(required_roles: &[Role], session: &Session) -> Option<&'static str> {
    if !session.is_authenticated {
        return Some(LOGIN_PATH);
    }
    if !required_roles.is_empty() {
        match session.role {
            Some(role) if required_roles.contains(&role) => {}
            _ => return Some(ROOT_PATH),
        }
    }
    None
}

/// default_landing
///
/// The role dispatcher: maps a session to its default landing path. Sessions
/// without a usable role (unauthenticated, or a role outside the closed set)
/// land on the login view.
pub fn default_landing(session: &Session) -> &'static str {
    if !session.is_authenticated {
        return LOGIN_PATH;
    }
    match session.role {
        Some(Role::Admin) => "/admin/dashboard",
        Some(Role::Venue) => "/venue/dashboard",
        Some(Role::Advertiser) => "/advertiser/dashboard",
        None => LOGIN_PATH,
    }
}

/// resolve
///
/// The dispatcher: one navigation in, one outcome out.
///
/// - `/` dispatches by role;
/// - a table hit runs the guard and renders or redirects accordingly;
/// - anything else falls through to a redirect to `/` (the catch-all).
///
/// Pure over its inputs: no I/O, no framework types, no side effects.
pub fn resolve(path: &str, session: &Session) -> Outcome {
    if path == ROOT_PATH {
        return Outcome::Redirect(default_landing(session));
    }
    match find_route(path) {
        Some(entry) => match entry.required_roles {
            None => Outcome::Render(entry.view),
            Some(required) => match guard(required, session) {
                None => Outcome::Render(entry.view),
                Some(target) => Outcome::Redirect(target),
            },
        },
        None => Outcome::Redirect(ROOT_PATH),
    }
}
