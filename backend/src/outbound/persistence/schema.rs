//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly. Regenerate with
//! `diesel print-schema` when the migrations change.

diesel::table! {
    /// User records mirrored from the external identity provider.
    ///
    /// The primary key is the provider's opaque identity reference, not a
    /// UUID. Organization and team bindings are null until the user
    /// creates or joins an organization.
    users (id) {
        /// External identity reference.
        id -> Varchar,
        /// Display name supplied by the identity provider.
        display_name -> Varchar,
        /// Email supplied by the identity provider.
        email -> Varchar,
        /// Role within the organization, `owner` or `member`.
        role -> Nullable<Varchar>,
        /// Owning organization, when bound.
        organization_id -> Nullable<Uuid>,
        /// Team joined through, when bound.
        team_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Tenant organizations.
    organizations (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique human-readable name.
        name -> Varchar,
        /// Unique URL-safe lookup key.
        slug -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Teams within an organization.
    teams (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Team name, matched case-sensitively on join.
        name -> Varchar,
        /// Owning organization.
        organization_id -> Uuid,
    }
}

diesel::table! {
    /// Monitored services of an organization.
    services (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Service name shown on the status page.
        name -> Varchar,
        /// Current status label, one of the four operator labels.
        status -> Varchar,
        /// Owning organization.
        organization_id -> Uuid,
    }
}

diesel::table! {
    /// Incidents reported against an organization.
    incidents (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Incident name or short description.
        name -> Varchar,
        /// Owning organization.
        organization_id -> Uuid,
        /// Creation timestamp; incidents start open.
        created_at -> Timestamptz,
        /// Close timestamp; null while open.
        closed_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(teams -> organizations (organization_id));
diesel::joinable!(services -> organizations (organization_id));
diesel::joinable!(incidents -> organizations (organization_id));

diesel::allow_tables_to_appear_in_same_query!(users, organizations, teams, services, incidents);
