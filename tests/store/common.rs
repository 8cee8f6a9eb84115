//! Shared fixtures for store tests.

use focus_foundation::{Type, Value};
use focus_store::{
    Domain, Entity, EntityStore, FieldDescriptor, Runtime, StoreConfig, StoreOptions, Validator,
    make_entity_store_with,
};
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once; set `RUST_LOG=focus_store=trace` to see output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn text() -> Domain {
    Domain::new("DO_TEXT", Type::String)
}

pub fn number() -> Domain {
    Domain::new("DO_NUMBER", Type::Number)
}

/// `Address { city, street }`, `Pet { name, species }`, and
/// `Person { name, age, email, address: Address, pets: [Pet] }`.
pub fn entities() -> Vec<Entity> {
    vec![
        Entity::new("Address")
            .with_field(FieldDescriptor::scalar("city", text()))
            .with_field(FieldDescriptor::scalar("street", text())),
        Entity::new("Pet")
            .with_field(FieldDescriptor::scalar("name", text()).required())
            .with_field(FieldDescriptor::scalar("species", text())),
        Entity::new("Person")
            .with_field(
                FieldDescriptor::scalar(
                    "name",
                    text().with_validator(Validator::StringLength {
                        min: Some(2),
                        max: Some(40),
                    }),
                )
                .required()
                .with_label("Full name"),
            )
            .with_field(FieldDescriptor::scalar(
                "age",
                number().with_validator(Validator::NumberRange {
                    min: Some(0.0),
                    max: Some(150.0),
                }),
            ))
            .with_field(FieldDescriptor::scalar(
                "email",
                text().with_validator(Validator::Email),
            ))
            .with_field(FieldDescriptor::object("address", "Address"))
            .with_field(FieldDescriptor::list("pets", "Pet")),
    ]
}

pub fn config() -> StoreConfig {
    StoreConfig::new()
        .object_of("person", "Person")
        .list("people", "Person")
}

pub fn store() -> EntityStore {
    store_with(StoreOptions::default())
}

pub fn store_with(options: StoreOptions) -> EntityStore {
    init_tracing();
    make_entity_store_with(&config(), entities(), &Runtime::new(), options).unwrap()
}

pub fn ada() -> Value {
    Value::map([
        ("name", Value::from("Ada Lovelace")),
        ("age", Value::Int(36)),
        ("address", Value::map([("city", Value::from("London"))])),
        (
            "pets",
            Value::list([Value::map([
                ("name", Value::from("Rex")),
                ("species", Value::from("dog")),
            ])]),
        ),
    ])
}
