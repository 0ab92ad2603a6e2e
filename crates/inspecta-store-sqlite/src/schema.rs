//! SQL schema for the Inspecta SQLite store.

/// The credentials table; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
/// Executed every time a store is opened.
pub const USERS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    username      TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL
);
";

/// The four dataset tables, for bootstrapping an empty database.
///
/// Production databases are loaded out of band; this DDL only has to agree
/// with them on column names used by the reports.
pub const DATASET_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS establishment (
    license_no    INTEGER PRIMARY KEY,
    name          TEXT NOT NULL,
    facility_type TEXT,
    address       TEXT,
    city          TEXT,
    state         TEXT,
    zip           INTEGER,
    latitude      REAL,
    longitude     REAL,
    ward          INTEGER,
    risk_level    TEXT
);

CREATE TABLE IF NOT EXISTS employee (
    employee_id INTEGER PRIMARY KEY,
    first_name  TEXT,
    last_name   TEXT,
    address     TEXT,
    city        TEXT,
    state       TEXT,
    zip         INTEGER,
    phone       TEXT,
    title       TEXT,
    salary      INTEGER,
    supervisor  INTEGER
);

CREATE TABLE IF NOT EXISTS inspection (
    inspection_id   INTEGER PRIMARY KEY,
    inspection_date TEXT,              -- ISO 8601 date
    inspection_type TEXT,
    results         TEXT,
    employee_id     INTEGER REFERENCES employee(employee_id),
    license_no      INTEGER REFERENCES establishment(license_no),
    followup_to     INTEGER
);

CREATE TABLE IF NOT EXISTS violation (
    violation_id      INTEGER PRIMARY KEY,
    inspection_id     INTEGER REFERENCES inspection(inspection_id),
    point_id          INTEGER,
    fine              INTEGER,
    inspector_comment TEXT
);
";
