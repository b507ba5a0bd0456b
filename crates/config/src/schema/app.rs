//! Default application schema for the built-in environment profiles.

use super::rules::{Field, ObjectSchema, Schema};

const ENVIRONMENTS: [&str; 4] = ["development", "staging", "production", "test"];
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Minimum length for signing and encryption secrets.
const MIN_SECRET_LEN: usize = 32;

/// Schema covering every section the built-in profiles define.
pub fn application_schema() -> Schema {
    Schema::new(
        ObjectSchema::new()
            .field(
                "env",
                Field::object(
                    ObjectSchema::new()
                        .field("NODE_ENV", Field::string().one_of(ENVIRONMENTS).required()),
                )
                .required(),
            )
            .field("app", Field::object(app_section()).required())
            .field("logging", Field::object(logging_section()))
            .field("database", Field::object(database_section()).required())
            .field("cache", Field::object(cache_section()))
            .field("auth", Field::object(auth_section()).required())
            .field("security", Field::object(security_section()))
            .field("billing", Field::object(billing_section()))
            .field("email", Field::object(email_section()))
            .field("features", Field::object(features_section())),
    )
}

fn port() -> Field {
    Field::number().integer().min(1.0).max(65535.0)
}

fn app_section() -> ObjectSchema {
    ObjectSchema::new()
        .field("name", Field::string().min_len(1).required())
        .field("url", Field::string().url())
        .field("host", Field::string().with_default("0.0.0.0"))
        .field("port", port().with_default(3000))
        .field("debug", Field::boolean().with_default(false))
}

fn logging_section() -> ObjectSchema {
    ObjectSchema::new()
        .field("level", Field::string().one_of(LOG_LEVELS).with_default("info"))
        .field("format", Field::string().one_of(["json", "pretty"]).with_default("pretty"))
}

fn database_section() -> ObjectSchema {
    ObjectSchema::new()
        .field("url", Field::string().url().required())
        .field(
            "pool",
            Field::object(
                ObjectSchema::new()
                    .field("min", Field::number().integer().min(0.0).with_default(2))
                    .field("max", Field::number().integer().min(1.0).with_default(10)),
            ),
        )
        .field("ssl", Field::boolean().with_default(false))
}

fn cache_section() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "redis",
            Field::object(ObjectSchema::new().field("url", Field::string().url())),
        )
        .field("ttl", Field::number().integer().min(0.0).with_default(300))
}

fn auth_section() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "jwt",
            Field::object(
                ObjectSchema::new()
                    .field("secret", Field::string().min_len(MIN_SECRET_LEN).required())
                    .field("expiresIn", Field::string().with_default("7d")),
            )
            .required(),
        )
        .field(
            "session",
            Field::object(
                ObjectSchema::new().field("secret", Field::string().min_len(MIN_SECRET_LEN)),
            ),
        )
}

fn security_section() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "cors",
            Field::object(
                ObjectSchema::new()
                    .field("enabled", Field::boolean().with_default(true))
                    .field("origins", Field::array(Field::string())),
            ),
        )
        .field(
            "rateLimit",
            Field::object(
                ObjectSchema::new()
                    .field("enabled", Field::boolean().with_default(true))
                    .field("max", Field::number().integer().min(1.0).with_default(100))
                    .field(
                        "windowMs",
                        Field::number().integer().min(1000.0).with_default(60_000),
                    ),
            ),
        )
        .field(
            "encryption",
            Field::object(
                ObjectSchema::new().field("key", Field::string().min_len(MIN_SECRET_LEN)),
            ),
        )
}

fn billing_section() -> ObjectSchema {
    ObjectSchema::new().field(
        "stripe",
        Field::object(
            ObjectSchema::new()
                .field("secretKey", Field::string().min_len(1))
                .field("webhookSecret", Field::string().min_len(1)),
        ),
    )
}

fn email_section() -> ObjectSchema {
    ObjectSchema::new().field("from", Field::string()).field(
        "smtp",
        Field::object(
            ObjectSchema::new()
                .field("host", Field::string())
                .field("port", port().with_default(587))
                .field("user", Field::string())
                .field("password", Field::string()),
        ),
    )
}

fn features_section() -> ObjectSchema {
    ObjectSchema::new()
        .field("signup", Field::boolean().with_default(true))
        .field("billing", Field::boolean().with_default(false))
        .field("maintenanceMode", Field::boolean().with_default(false))
}
