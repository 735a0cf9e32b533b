//! Esquema Diesel del catálogo. Reemplazable con `diesel print-schema`.

diesel::table! {
    files (id) {
        id -> Int4,
        name -> Varchar,
        path -> Varchar,
        version -> Int4,
        hash -> Varchar,
        date -> Timestamp,
        software_version -> Varchar,
    }
}
