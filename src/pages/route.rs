//! Page routes.
//!
//! A location is resolved to a [`Page`] once; controllers are then picked by
//! matching on the page, never by re-inspecting the path.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::session::UserType;

/// Every page of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Index,
    Login,
    Register,
    Contact,
    Faq,
    DonorProfile,
    AdminDashboard,
    CenterWorkspace,
}

/// Path markers in resolution order. The first marker contained in a path wins.
const MARKERS: &[(&str, Page)] = &[
    ("index.html", Page::Index),
    ("login.html", Page::Login),
    ("register.html", Page::Register),
    ("contact.html", Page::Contact),
    ("faq.html", Page::Faq),
    ("profile.html", Page::DonorProfile),
    ("admin.html", Page::AdminDashboard),
    ("workspace_center.html", Page::CenterWorkspace),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown page '{0}'")]
pub struct UnknownPage(pub String);

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Index,
        Page::Login,
        Page::Register,
        Page::Contact,
        Page::Faq,
        Page::DonorProfile,
        Page::AdminDashboard,
        Page::CenterWorkspace,
    ];

    /// Resolve a location path to a page.
    pub fn resolve(path: &str) -> Option<Page> {
        MARKERS
            .iter()
            .find(|(marker, _)| path.contains(marker))
            .map(|(_, page)| *page)
    }

    /// Landing page after logging in with `user_type`.
    pub fn landing_for(user_type: UserType) -> Page {
        match user_type {
            UserType::Admin => Page::AdminDashboard,
            UserType::Donante => Page::DonorProfile,
            UserType::CentroSalud => Page::CenterWorkspace,
        }
    }

    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Login => "login",
            Page::Register => "register",
            Page::Contact => "contact",
            Page::Faq => "faq",
            Page::DonorProfile => "profile",
            Page::AdminDashboard => "admin",
            Page::CenterWorkspace => "workspace",
        }
    }

    /// Canonical location of the page.
    pub fn path(&self) -> &'static str {
        match self {
            Page::Index => "/index.html",
            Page::Login => "/sections/auth/login.html",
            Page::Register => "/sections/auth/register.html",
            Page::Contact => "/sections/contact.html",
            Page::Faq => "/sections/faq.html",
            Page::DonorProfile => "/sections/donor/profile.html",
            Page::AdminDashboard => "/sections/admin/admin.html",
            Page::CenterWorkspace => "/sections/admin/workspace_center.html",
        }
    }

    /// Role required to open the page, if any.
    pub fn required_role(&self) -> Option<UserType> {
        match self {
            Page::DonorProfile => Some(UserType::Donante),
            Page::AdminDashboard => Some(UserType::Admin),
            Page::CenterWorkspace => Some(UserType::CentroSalud),
            _ => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = UnknownPage;

    /// Accepts a short name (`profile`) or a path (`/sections/donor/profile.html`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Page::ALL
            .into_iter()
            .find(|page| page.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| Page::resolve(trimmed))
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}
