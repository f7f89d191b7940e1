//! The hotel route table

use super::tree::{self, Navigation, RouteEntry, RouteNode};
use super::{Layout, Page};
use crate::auth::Role;
use crate::session::Session;

/// Statically declared route tree
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteNode>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteNode>) -> Self {
        Self { routes }
    }

    /// Routes of the hotel site and both staff dashboards
    pub fn hotel() -> Self {
        let public = RouteNode::branch(
            "",
            vec![
                RouteNode::page("/", Page::Home),
                RouteNode::page("about", Page::About),
                RouteNode::page("rooms", Page::Rooms),
                RouteNode::page("contact", Page::Contact),
                RouteNode::page("gallery", Page::Gallery),
                RouteNode::page("offers", Page::Offers),
                RouteNode::page("booking", Page::Booking),
                RouteNode::page("tariff", Page::Tariff),
                RouteNode::page("attractions", Page::Attractions),
                RouteNode::page("attractions/:id", Page::AttractionDetail),
                RouteNode::page("auth/login", Page::Login),
                RouteNode::page("privacy-policy", Page::PrivacyPolicy),
                RouteNode::page("terms-and-conditions", Page::TermsAndConditions),
                RouteNode::page("cancellation-policy", Page::CancellationPolicy),
                RouteNode::page("coupons", Page::Coupons),
            ],
        )
        .with_layout(Layout::Public);

        let admin = RouteNode::branch(
            "admin",
            vec![
                RouteNode::index(Page::AdminOverview),
                RouteNode::page("rooms", Page::AdminRooms),
                RouteNode::page("bookings", Page::AdminBookings),
                RouteNode::page("receptionists", Page::AdminReceptionists),
                RouteNode::page("guest-management", Page::AdminGuests),
                RouteNode::page("system-settings", Page::AdminSystemSettings),
                RouteNode::page("salary-reports", Page::AdminSalaryReports),
                RouteNode::page("gallery", Page::AdminGallery),
                RouteNode::page("memberships", Page::AdminMemberships),
                RouteNode::page("coupons", Page::AdminCoupons),
            ],
        )
        .guarded(Role::Admin)
        .with_layout(Layout::Admin);

        let receptionist = RouteNode::branch(
            "receptionist",
            vec![
                RouteNode::page("dashboard", Page::ReceptionistDashboard),
                RouteNode::page("new-booking", Page::NewBooking),
                RouteNode::page("billing", Page::Billing),
                RouteNode::page("bookinglist", Page::BookingList),
                RouteNode::page("rooms", Page::RoomStatus),
                RouteNode::page("coupons/select", Page::CouponSelect),
                RouteNode::page("guests", Page::GuestDirectory),
                RouteNode::page("profile", Page::Profile),
                RouteNode::page("receipt/:bookingId", Page::Receipt),
                RouteNode::page("notifications", Page::Notifications),
                RouteNode::page("settings", Page::ReceptionistSettings),
            ],
        )
        .guarded(Role::Receptionist)
        .with_layout(Layout::Receptionist);

        Self::new(vec![
            public,
            admin,
            receptionist,
            RouteNode::page("unauthorized", Page::Unauthorized),
        ])
    }

    /// Resolve a request path for the given session
    pub fn resolve(&self, path: &str, session: &Session) -> Navigation {
        tree::resolve(&self.routes, path, session)
    }

    /// Every declared page with its full path and required role
    pub fn entries(&self) -> Vec<RouteEntry> {
        tree::entries(&self.routes)
    }

    /// Number of declared pages
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::hotel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::GuardOutcome;
    use crate::routing::Navigation;

    /// Concrete path for an entry, filling params with sample values
    fn concrete(path: &str) -> String {
        path.replace(":id", "7").replace(":bookingId", "BK-1")
    }

    fn protected(role: Role) -> Vec<String> {
        RouteTable::hotel()
            .entries()
            .into_iter()
            .filter(|e| e.required == Some(role))
            .map(|e| concrete(&e.path))
            .collect()
    }

    #[test]
    fn test_declared_surface() {
        let table = RouteTable::hotel();
        assert_eq!(protected(Role::Admin).len(), 10);
        assert_eq!(protected(Role::Receptionist).len(), 11);
        assert_eq!(table.len(), 15 + 10 + 11 + 1);
        assert!(protected(Role::Admin).iter().all(|p| p.starts_with("/admin")));
        assert!(protected(Role::Receptionist)
            .iter()
            .all(|p| p.starts_with("/receptionist/")));
    }

    #[test]
    fn test_empty_branches_declare_no_pages() {
        let table = RouteTable::new(vec![RouteNode::branch("admin", vec![])]);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert!(!RouteTable::hotel().is_empty());
    }

    #[test]
    fn test_anonymous_is_sent_to_login_everywhere_protected() {
        let table = RouteTable::hotel();
        let anonymous = Session::anonymous();
        for path in protected(Role::Admin)
            .into_iter()
            .chain(protected(Role::Receptionist))
        {
            let nav = table.resolve(&path, &anonymous);
            match nav {
                Navigation::Redirect(r) => {
                    assert_eq!(r.to, "/auth/login", "{}", path);
                    assert_eq!(r.reason, GuardOutcome::Unauthenticated);
                }
                other => panic!("{} resolved to {:?}", path, other),
            }
        }
    }

    #[test]
    fn test_admin_session_access() {
        let table = RouteTable::hotel();
        let admin = Session::new("xyz", "admin");

        for path in protected(Role::Admin) {
            let nav = table.resolve(&path, &admin);
            assert!(nav.page().is_some(), "{} resolved to {:?}", path, nav);
        }
        for path in protected(Role::Receptionist) {
            assert_eq!(
                table.resolve(&path, &admin).redirect_target(),
                Some("/unauthorized"),
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_receptionist_session_access() {
        let table = RouteTable::hotel();
        let receptionist = Session::new("abc", "receptionist");

        for path in protected(Role::Receptionist) {
            let nav = table.resolve(&path, &receptionist);
            assert!(nav.page().is_some(), "{} resolved to {:?}", path, nav);
        }
        for path in protected(Role::Admin) {
            assert_eq!(
                table.resolve(&path, &receptionist).redirect_target(),
                Some("/unauthorized"),
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_receptionist_cannot_open_admin_rooms() {
        let nav = RouteTable::hotel().resolve("/admin/rooms", &Session::new("abc", "receptionist"));
        assert_eq!(nav.redirect_target(), Some("/unauthorized"));
    }

    #[test]
    fn test_empty_session_dashboard_goes_to_login() {
        let nav = RouteTable::hotel().resolve("/receptionist/dashboard", &Session::anonymous());
        assert_eq!(nav.redirect_target(), Some("/auth/login"));
    }

    #[test]
    fn test_admin_index_renders_overview() {
        let nav = RouteTable::hotel().resolve("/admin", &Session::new("xyz", "admin"));
        let Navigation::Render(m) = nav else {
            panic!("expected overview");
        };
        assert_eq!(m.page, Page::AdminOverview);
        assert_eq!(m.layouts, vec![Layout::Admin]);
    }

    #[test]
    fn test_receptionist_pages_share_layout() {
        let nav = RouteTable::hotel().resolve(
            "/receptionist/receipt/BK-9",
            &Session::new("abc", "receptionist"),
        );
        let Navigation::Render(m) = nav else {
            panic!("expected receipt");
        };
        assert_eq!(m.page, Page::Receipt);
        assert_eq!(m.layouts, vec![Layout::Receptionist]);
        assert_eq!(m.params.get("bookingId").map(String::as_str), Some("BK-9"));
    }

    #[test]
    fn test_public_and_fallback_pages_ignore_session() {
        let table = RouteTable::hotel();
        for session in [
            Session::anonymous(),
            Session::new("t", "admin"),
            Session::new("t", "receptionist"),
        ] {
            assert_eq!(table.resolve("/rooms", &session).page(), Some(Page::Rooms));
            assert_eq!(table.resolve("/auth/login", &session).page(), Some(Page::Login));
            assert_eq!(
                table.resolve("/unauthorized", &session).page(),
                Some(Page::Unauthorized)
            );
        }
    }

    #[test]
    fn test_partial_sessions_do_not_panic() {
        let table = RouteTable::hotel();
        let token_only = Session::from_parts(Some("t".to_string()), None);
        let role_only = Session::from_parts(None, Some("admin".to_string()));

        assert_eq!(
            table.resolve("/admin", &token_only).redirect_target(),
            Some("/unauthorized")
        );
        assert_eq!(
            table.resolve("/admin", &role_only).redirect_target(),
            Some("/auth/login")
        );
    }
}
