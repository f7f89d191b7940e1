//! Page Catalog
//!
//! Every view the route tree can render, with the backend endpoint the view
//! loads its data from.

use serde::Serialize;

use super::Params;

/// Shared chrome wrapped around a group of pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Marketing header/footer for the public site
    Public,
    /// Admin sidebar
    Admin,
    /// Receptionist sidebar
    Receptionist,
}

/// A renderable page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    // Public site
    Home,
    About,
    Rooms,
    Contact,
    Gallery,
    Offers,
    Booking,
    Tariff,
    Attractions,
    AttractionDetail,
    Login,
    PrivacyPolicy,
    TermsAndConditions,
    CancellationPolicy,
    Coupons,

    // Admin dashboard
    AdminOverview,
    AdminRooms,
    AdminBookings,
    AdminReceptionists,
    AdminGuests,
    AdminSystemSettings,
    AdminSalaryReports,
    AdminGallery,
    AdminMemberships,
    AdminCoupons,

    // Receptionist dashboard
    ReceptionistDashboard,
    NewBooking,
    Billing,
    BookingList,
    RoomStatus,
    CouponSelect,
    GuestDirectory,
    Profile,
    Receipt,
    Notifications,
    ReceptionistSettings,

    Unauthorized,
}

impl Page {
    /// Stable identifier, also used in JSON output
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::About => "about",
            Page::Rooms => "rooms",
            Page::Contact => "contact",
            Page::Gallery => "gallery",
            Page::Offers => "offers",
            Page::Booking => "booking",
            Page::Tariff => "tariff",
            Page::Attractions => "attractions",
            Page::AttractionDetail => "attraction-detail",
            Page::Login => "login",
            Page::PrivacyPolicy => "privacy-policy",
            Page::TermsAndConditions => "terms-and-conditions",
            Page::CancellationPolicy => "cancellation-policy",
            Page::Coupons => "coupons",
            Page::AdminOverview => "admin-overview",
            Page::AdminRooms => "admin-rooms",
            Page::AdminBookings => "admin-bookings",
            Page::AdminReceptionists => "admin-receptionists",
            Page::AdminGuests => "admin-guests",
            Page::AdminSystemSettings => "admin-system-settings",
            Page::AdminSalaryReports => "admin-salary-reports",
            Page::AdminGallery => "admin-gallery",
            Page::AdminMemberships => "admin-memberships",
            Page::AdminCoupons => "admin-coupons",
            Page::ReceptionistDashboard => "receptionist-dashboard",
            Page::NewBooking => "new-booking",
            Page::Billing => "billing",
            Page::BookingList => "booking-list",
            Page::RoomStatus => "room-status",
            Page::CouponSelect => "coupon-select",
            Page::GuestDirectory => "guest-directory",
            Page::Profile => "profile",
            Page::Receipt => "receipt",
            Page::Notifications => "notifications",
            Page::ReceptionistSettings => "receptionist-settings",
            Page::Unauthorized => "unauthorized",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Welcome",
            Page::About => "About Us",
            Page::Rooms => "Our Rooms",
            Page::Contact => "Contact",
            Page::Gallery => "Gallery",
            Page::Offers => "Special Offers",
            Page::Booking => "Book Your Stay",
            Page::Tariff => "Tariff",
            Page::Attractions => "Nearby Attractions",
            Page::AttractionDetail => "Attraction",
            Page::Login => "Staff Login",
            Page::PrivacyPolicy => "Privacy Policy",
            Page::TermsAndConditions => "Terms & Conditions",
            Page::CancellationPolicy => "Cancellation Policy",
            Page::Coupons => "Coupons",
            Page::AdminOverview => "Overview",
            Page::AdminRooms => "Room Management",
            Page::AdminBookings => "Booking Management",
            Page::AdminReceptionists => "Receptionists",
            Page::AdminGuests => "Guest Management",
            Page::AdminSystemSettings => "System Settings",
            Page::AdminSalaryReports => "Salary Reports",
            Page::AdminGallery => "Gallery Management",
            Page::AdminMemberships => "Memberships",
            Page::AdminCoupons => "Coupon Management",
            Page::ReceptionistDashboard => "Front Desk",
            Page::NewBooking => "New Booking",
            Page::Billing => "Billing",
            Page::BookingList => "Bookings",
            Page::RoomStatus => "Room Status",
            Page::CouponSelect => "Apply Coupon",
            Page::GuestDirectory => "Guest Directory",
            Page::Profile => "My Profile",
            Page::Receipt => "Receipt",
            Page::Notifications => "Notifications",
            Page::ReceptionistSettings => "Settings",
            Page::Unauthorized => "Access Denied",
        }
    }

    /// Backend endpoint template, `{name}` placeholders filled from route params
    pub fn endpoint_template(&self) -> Option<&'static str> {
        let endpoint = match self {
            Page::Home
            | Page::About
            | Page::Contact
            | Page::Login
            | Page::PrivacyPolicy
            | Page::TermsAndConditions
            | Page::CancellationPolicy
            | Page::Unauthorized => return None,

            Page::Rooms | Page::AdminRooms | Page::RoomStatus => "/rooms",
            Page::Gallery | Page::AdminGallery => "/gallery",
            Page::Offers => "/offers",
            Page::Booking | Page::NewBooking => "/rooms/available",
            Page::Tariff => "/rooms/tariff",
            Page::Attractions => "/attractions",
            Page::AttractionDetail => "/attractions/{id}",
            Page::Coupons | Page::AdminCoupons => "/coupons",
            Page::AdminOverview => "/admin/overview",
            Page::AdminBookings | Page::BookingList => "/bookings",
            Page::AdminReceptionists => "/receptionists",
            Page::AdminGuests | Page::GuestDirectory => "/guests",
            Page::AdminSystemSettings => "/settings",
            Page::AdminSalaryReports => "/salary/reports",
            Page::AdminMemberships => "/memberships",
            Page::ReceptionistDashboard => "/receptionist/dashboard",
            Page::Billing => "/bookings/billing",
            Page::CouponSelect => "/coupons/active",
            Page::Profile => "/receptionist/profile",
            Page::Receipt => "/bookings/{bookingId}/receipt",
            Page::Notifications => "/notifications",
            Page::ReceptionistSettings => "/receptionist/settings",
        };
        Some(endpoint)
    }

    /// Concrete backend endpoint for this page, if it loads any data
    ///
    /// Returns `None` when a placeholder has no matching route param.
    pub fn data_endpoint(&self, params: &Params) -> Option<String> {
        let template = self.endpoint_template()?;
        let mut endpoint = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            let end = start + rest[start..].find('}')?;
            let name = &rest[start + 1..end];
            let Some(value) = params.get(name) else {
                tracing::warn!(page = %self.slug(), param = %name, "Missing route param for endpoint");
                return None;
            };
            endpoint.push_str(&rest[..start]);
            endpoint.push_str(&urlencoding::encode(value));
            rest = &rest[end + 1..];
        }
        endpoint.push_str(rest);

        Some(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_endpoint() {
        assert_eq!(
            Page::AdminRooms.data_endpoint(&Params::new()).as_deref(),
            Some("/rooms")
        );
        assert_eq!(Page::Login.data_endpoint(&Params::new()), None);
    }

    #[test]
    fn test_endpoint_params_are_filled_and_encoded() {
        let mut params = Params::new();
        params.insert("bookingId".to_string(), "BK 42".to_string());
        assert_eq!(
            Page::Receipt.data_endpoint(&params).as_deref(),
            Some("/bookings/BK%2042/receipt")
        );
    }

    #[test]
    fn test_missing_param_yields_no_endpoint() {
        assert_eq!(Page::AttractionDetail.data_endpoint(&Params::new()), None);
    }

    #[test]
    fn test_slug_matches_serde_name() {
        for page in [Page::AdminSystemSettings, Page::Home, Page::Unauthorized] {
            let json = serde_json::to_string(&page).unwrap();
            assert_eq!(json, format!("\"{}\"", page.slug()));
        }
    }
}
