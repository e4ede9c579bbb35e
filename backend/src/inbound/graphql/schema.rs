//! GraphQL schema registry.
//!
//! Operations are registered explicitly through [`SchemaRegistry`]; nothing
//! is discovered implicitly. The resulting schema is immutable and equivalent
//! to:
//!
//! ```graphql
//! type Query { hello(name: String): String }
//! type Subscription { timer(seconds: Int!): Timer }
//! enum Status { RUNNING DONE }
//! type Timer { remainingTime: Int! status: Status! }
//! ```
//!
//! Argument coercion happens inside async-graphql before any resolver runs;
//! coercion failures and resolver errors are reported in the GraphQL response
//! body rather than as transport errors.

use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, FieldValue, InputValue, Object, ResolverContext, Schema,
    SchemaError, Subscription, SubscriptionField, SubscriptionFieldFuture, TypeRef,
};
use async_graphql::{Error as GraphqlError, ErrorExtensions, Name, Value};
use futures_util::StreamExt;
use serde_json::json;
use tracing::debug;

use crate::domain::{TimerError, TimerService, TimerSnapshot, greet};

/// Executable GraphQL schema shared by the HTTP and WebSocket transports.
pub type GraphqlSchema = Schema;

/// Root query type name.
pub const QUERY_TYPE: &str = "Query";
/// Root subscription type name.
pub const SUBSCRIPTION_TYPE: &str = "Subscription";
/// Countdown snapshot type name.
pub const TIMER_TYPE: &str = "Timer";
/// Countdown status enum name.
pub const STATUS_TYPE: &str = "Status";

/// Extension code attached to argument validation failures.
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";

/// Builder collecting named operations and supporting types before the
/// schema is validated and frozen.
///
/// # Examples
/// ```
/// use hello_timer::domain::TimerService;
/// use hello_timer::inbound::graphql::schema::{SchemaRegistry, hello_field, status_enum, timer_field, timer_object};
///
/// let schema = SchemaRegistry::new()
///     .enumeration(status_enum())
///     .object(timer_object())
///     .query(hello_field())
///     .subscription(timer_field(TimerService::default()))
///     .build()
///     .expect("valid schema");
/// assert!(schema.sdl().contains("enum Status"));
/// ```
pub struct SchemaRegistry {
    query: Object,
    subscription: Subscription,
    objects: Vec<Object>,
    enums: Vec<Enum>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Start an empty registry with the `Query` and `Subscription` roots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: Object::new(QUERY_TYPE),
            subscription: Subscription::new(SUBSCRIPTION_TYPE),
            objects: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Register a query field.
    #[must_use]
    pub fn query(mut self, field: Field) -> Self {
        self.query = self.query.field(field);
        self
    }

    /// Register a subscription field.
    #[must_use]
    pub fn subscription(mut self, field: SubscriptionField) -> Self {
        self.subscription = self.subscription.field(field);
        self
    }

    /// Register an output object type.
    #[must_use]
    pub fn object(mut self, object: Object) -> Self {
        self.objects.push(object);
        self
    }

    /// Register an enum type.
    #[must_use]
    pub fn enumeration(mut self, enumeration: Enum) -> Self {
        self.enums.push(enumeration);
        self
    }

    /// Validate the registrations and freeze them into a schema.
    pub fn build(self) -> Result<GraphqlSchema, SchemaError> {
        let Self {
            query,
            subscription,
            objects,
            enums,
        } = self;

        let mut builder = Schema::build(QUERY_TYPE, None, Some(SUBSCRIPTION_TYPE));
        for enumeration in enums {
            builder = builder.register(enumeration);
        }
        for object in objects {
            builder = builder.register(object);
        }
        builder.register(query).register(subscription).finish()
    }
}

/// Build the service schema with the countdown backed by `timers`.
pub fn build_schema(timers: TimerService) -> Result<GraphqlSchema, SchemaError> {
    SchemaRegistry::new()
        .enumeration(status_enum())
        .object(timer_object())
        .query(hello_field())
        .subscription(timer_field(timers))
        .build()
}

/// `Status` enum.
#[must_use]
pub fn status_enum() -> Enum {
    Enum::new(STATUS_TYPE)
        .item(EnumItem::new("RUNNING"))
        .item(EnumItem::new("DONE"))
}

/// `Timer` object resolving fields from a [`TimerSnapshot`] parent value.
#[must_use]
pub fn timer_object() -> Object {
    Object::new(TIMER_TYPE)
        .field(Field::new(
            "remainingTime",
            TypeRef::named_nn(TypeRef::INT),
            |ctx| {
                FieldFuture::new(async move {
                    let snapshot = ctx.parent_value.try_downcast_ref::<TimerSnapshot>()?;
                    Ok(Some(Value::from(snapshot.remaining_time)))
                })
            },
        ))
        .field(Field::new(
            "status",
            TypeRef::named_nn(STATUS_TYPE),
            |ctx| {
                FieldFuture::new(async move {
                    let snapshot = ctx.parent_value.try_downcast_ref::<TimerSnapshot>()?;
                    Ok(Some(Value::Enum(Name::new(snapshot.status.as_str()))))
                })
            },
        ))
}

/// `Query.hello(name: String): String`.
#[must_use]
pub fn hello_field() -> Field {
    Field::new("hello", TypeRef::named(TypeRef::STRING), |ctx| {
        FieldFuture::new(async move {
            let name = required_string(&ctx, "name")?;
            Ok(Some(Value::from(greet(&name))))
        })
    })
    .argument(InputValue::new("name", TypeRef::named(TypeRef::STRING)))
}

/// `Subscription.timer(seconds: Int!): Timer`.
///
/// Every subscription starts its own countdown; the stream is dropped (and
/// the countdown cancelled) when the transport abandons the operation.
#[must_use]
pub fn timer_field(timers: TimerService) -> SubscriptionField {
    SubscriptionField::new("timer", TypeRef::named(TIMER_TYPE), move |ctx| {
        let timers = timers.clone();
        SubscriptionFieldFuture::new(async move {
            let seconds = ctx.args.try_get("seconds")?.i64()?;
            let countdown = timers.start(seconds).map_err(timer_error)?;
            debug!(seconds, "timer subscription started");
            Ok(countdown.map(|snapshot| Ok::<_, GraphqlError>(FieldValue::owned_any(snapshot))))
        })
    })
    .argument(InputValue::new("seconds", TypeRef::named_nn(TypeRef::INT)))
}

fn required_string(ctx: &ResolverContext<'_>, name: &str) -> async_graphql::Result<String> {
    match ctx.args.get(name) {
        Some(value) if !value.is_null() => value.string().map(str::to_owned),
        _ => Err(invalid_argument(format!("argument `{name}` is required"))),
    }
}

fn invalid_argument(message: impl Into<String>) -> GraphqlError {
    GraphqlError::new(message).extend_with(|_, extensions| extensions.set("code", INVALID_ARGUMENT))
}

fn timer_error(error: TimerError) -> GraphqlError {
    let details = match error {
        TimerError::Negative(requested) => json!({ "requested": requested }),
        TimerError::TooLong { requested, max } => json!({ "requested": requested, "max": max }),
    };
    invalid_argument(error.to_string()).extend_with(|_, extensions| {
        if let Ok(value) = Value::from_json(details) {
            extensions.set("details", value);
        }
    })
}
