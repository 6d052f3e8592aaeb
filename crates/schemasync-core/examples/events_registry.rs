//! Builds the declared registry for the events backend and prints it as
//! JSON, suitable for `schemasync apply --schema-file`.

use schemasync_core::{ColumnKind, ColumnSpec, DefaultValue, SchemaSnapshot, TableSpec};

fn uuid_pk() -> ColumnSpec {
    ColumnSpec::new("id", ColumnKind::varchar(36)).primary_key()
}

fn timestamps() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("created_at", ColumnKind::Timestamp).default_value(DefaultValue::Now),
        ColumnSpec::new("updated_at", ColumnKind::Timestamp),
    ]
}

fn declared_schema() -> schemasync_core::Result<SchemaSnapshot> {
    let users = TableSpec::new(
        "users",
        [
            vec![
                uuid_pk(),
                ColumnSpec::new("username", ColumnKind::varchar(100)).not_null(),
                ColumnSpec::new("email", ColumnKind::varchar(255)).not_null(),
                ColumnSpec::new("name", ColumnKind::varchar(255)),
                ColumnSpec::new("hashed_password", ColumnKind::varchar(255)).not_null(),
                ColumnSpec::new("role", ColumnKind::varchar(50))
                    .not_null()
                    .default_value(DefaultValue::Text("user".to_string())),
            ],
            timestamps(),
        ]
        .concat(),
    )?;

    let artists = TableSpec::new(
        "artists",
        [
            vec![
                uuid_pk(),
                ColumnSpec::new("name", ColumnKind::varchar(255)).not_null(),
                ColumnSpec::new("role", ColumnKind::varchar(100)),
                ColumnSpec::new("role_translations", ColumnKind::Json),
                ColumnSpec::new("description", ColumnKind::Text),
                ColumnSpec::new("description_translations", ColumnKind::Json),
                ColumnSpec::new("image_url", ColumnKind::Text),
                ColumnSpec::new("events_count", ColumnKind::Integer)
                    .default_value(DefaultValue::Int(0)),
                ColumnSpec::new("badge", ColumnKind::varchar(20)),
                ColumnSpec::new("instagram", ColumnKind::varchar(255)),
                ColumnSpec::new("show_on_website", ColumnKind::Boolean)
                    .default_value(DefaultValue::Bool(true)),
            ],
            timestamps(),
        ]
        .concat(),
    )?;

    let events = TableSpec::new(
        "events",
        [
            vec![
                uuid_pk(),
                ColumnSpec::new("title", ColumnKind::varchar(255)).not_null(),
                ColumnSpec::new("title_translations", ColumnKind::Json),
                ColumnSpec::new("description", ColumnKind::Text).not_null(),
                ColumnSpec::new("description_translations", ColumnKind::Json),
                ColumnSpec::new("category", ColumnKind::varchar(50)).not_null(),
                ColumnSpec::new("date", ColumnKind::varchar(20)).not_null(),
                ColumnSpec::new("time", ColumnKind::varchar(10)).not_null(),
                ColumnSpec::new("location", ColumnKind::varchar(255)).not_null(),
                ColumnSpec::new("address", ColumnKind::varchar(500)),
                ColumnSpec::new("city", ColumnKind::varchar(100)).not_null(),
                ColumnSpec::new("maps_embed_url", ColumnKind::Text),
                ColumnSpec::new("image_url", ColumnKind::Text),
                ColumnSpec::new("capacity", ColumnKind::Integer),
                ColumnSpec::new("featured", ColumnKind::Boolean)
                    .default_value(DefaultValue::Bool(false)),
                ColumnSpec::new("status", ColumnKind::varchar(20))
                    .default_value(DefaultValue::Text("upcoming".to_string())),
            ],
            timestamps(),
        ]
        .concat(),
    )?;

    let packs = TableSpec::new(
        "packs",
        [
            vec![
                uuid_pk(),
                ColumnSpec::new("name", ColumnKind::varchar(100)).not_null(),
                ColumnSpec::new("name_translations", ColumnKind::Json),
                ColumnSpec::new("type", ColumnKind::varchar(50)).not_null(),
                ColumnSpec::new("description", ColumnKind::Text),
                ColumnSpec::new("description_translations", ColumnKind::Json),
                ColumnSpec::new("price", ColumnKind::Float).not_null(),
                ColumnSpec::new("currency", ColumnKind::varchar(10))
                    .default_value(DefaultValue::Text("€".to_string())),
                ColumnSpec::new("unit", ColumnKind::varchar(50)),
                ColumnSpec::new("features", ColumnKind::Json),
                ColumnSpec::new("features_translations", ColumnKind::Json),
                ColumnSpec::new("is_active", ColumnKind::Boolean)
                    .default_value(DefaultValue::Bool(true)),
            ],
            timestamps(),
        ]
        .concat(),
    )?;

    let event_artists = TableSpec::new(
        "event_artists",
        vec![
            ColumnSpec::new("event_id", ColumnKind::varchar(36)).primary_key(),
            ColumnSpec::new("artist_id", ColumnKind::varchar(36)).primary_key(),
            ColumnSpec::new("start_time", ColumnKind::varchar(10)),
            ColumnSpec::new("end_time", ColumnKind::varchar(10)),
            ColumnSpec::new("order", ColumnKind::Integer).default_value(DefaultValue::Int(0)),
        ],
    )?;

    let event_packs = TableSpec::new(
        "event_packs",
        vec![
            ColumnSpec::new("event_id", ColumnKind::varchar(36)).primary_key(),
            ColumnSpec::new("pack_id", ColumnKind::varchar(36)).primary_key(),
            ColumnSpec::new("is_soldout", ColumnKind::Boolean)
                .default_value(DefaultValue::Bool(false)),
        ],
    )?;

    SchemaSnapshot::from_tables(vec![
        users,
        artists,
        events,
        packs,
        event_artists,
        event_packs,
    ])
}

fn main() -> schemasync_core::Result<()> {
    let snapshot = declared_schema()?;
    println!("{}", snapshot.to_json_pretty()?);
    Ok(())
}
