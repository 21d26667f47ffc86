//! Role labels and user display helpers for menus and badges.

#[cfg(test)]
#[path = "roles_test.rs"]
mod roles_test;

use crate::net::types::User;

pub const GUEST_ROLE: &str = "guest";
pub const GUEST_NAME: &str = "Guest User";

/// Human label for a role string; unknown roles read as "Guest".
pub fn role_label(role: &str) -> &'static str {
    match role {
        "super_admin" => "Super Admin",
        "admin" => "Admin",
        "teacher" => "Teacher",
        "student" => "Student",
        "parent" => "Parent",
        _ => "Guest",
    }
}

/// First role of the user, or `guest`.
pub fn primary_role(user: Option<&User>) -> &str {
    user.and_then(|u| u.roles.first()).map_or(GUEST_ROLE, String::as_str)
}

pub fn display_name(user: Option<&User>) -> String {
    match user {
        Some(u) => format!("{} {}", u.first_name, u.last_name).trim().to_owned(),
        None => GUEST_NAME.to_owned(),
    }
}

/// Upper-cased first letters of first and last name.
pub fn initials(user: Option<&User>) -> String {
    let Some(u) = user else {
        return "GU".to_owned();
    };
    [&u.first_name, &u.last_name]
        .iter()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
