//! SQL schema for the HBnB SQLite store.
//!
//! Executed once at connection startup. There is no migration tooling; the
//! schema is idempotent thanks to `CREATE TABLE IF NOT EXISTS`.

/// Full schema DDL.
///
/// Foreign keys are declared for documentation but left unenforced
/// (`PRAGMA foreign_keys` stays off), so deleting a referenced row behaves
/// the same as in the in-process backends.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    id          TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    password    TEXT NOT NULL,   -- argon2 PHC string
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    is_admin    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS countries (
    code  TEXT PRIMARY KEY,      -- two letters
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS cities (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    country_code  TEXT NOT NULL REFERENCES countries(code),
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS amenities (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS places (
    id                   TEXT PRIMARY KEY,
    name                 TEXT NOT NULL,
    description          TEXT NOT NULL,
    address              TEXT NOT NULL,
    latitude             REAL NOT NULL,
    longitude            REAL NOT NULL,
    host_id              TEXT NOT NULL REFERENCES users(id),
    city_id              TEXT NOT NULL REFERENCES cities(id),
    price_per_night      INTEGER NOT NULL,
    number_of_rooms      INTEGER NOT NULL,
    number_of_bathrooms  INTEGER NOT NULL,
    max_guests           INTEGER NOT NULL,
    created_at           TEXT NOT NULL,
    updated_at           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reviews (
    id          TEXT PRIMARY KEY,
    place_id    TEXT NOT NULL REFERENCES places(id),
    user_id     TEXT NOT NULL REFERENCES users(id),
    comment     TEXT NOT NULL,
    rating      REAL NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS cities_country_idx ON cities(country_code);
CREATE INDEX IF NOT EXISTS places_host_idx    ON places(host_id);
CREATE INDEX IF NOT EXISTS reviews_place_idx  ON reviews(place_id);
";
