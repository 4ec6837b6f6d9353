//! Resource schemas driving the generic CRUD table.
//!
//! A [`ResourceSchema`] names one REST resource and lists its fields in
//! column order, together with the per-field rules the form validator
//! enforces and the alert messages shown when an operation fails. The three
//! built-in back-office resources are exposed through
//! [`ResourceCatalog::builtin`].

/// Input kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// E-mail address.
    Email,
    /// Telephone number.
    Phone,
    /// Number, sent to the API as a JSON number.
    Number,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
}

impl FieldKind {
    /// HTML `input` type used when rendering the form.
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "tel",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

/// How a field value is shown in a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFormat {
    /// Value as returned by the API.
    Plain,
    /// Value prefixed with `$`.
    Currency,
    /// Date shown as `dd/mm/yyyy`.
    Date,
}

/// One field of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire and form name of the field.
    pub name: &'static str,
    /// Column header and form label.
    pub label: &'static str,
    /// Input kind.
    pub kind: FieldKind,
    /// Table cell formatting.
    pub display: DisplayFormat,
    /// Whether an empty value blocks submission.
    pub required: bool,
    /// Alert shown when the value is not a positive number. Only set on
    /// numeric fields that must be strictly greater than zero.
    pub positive: Option<&'static str>,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        let display = match kind {
            FieldKind::Date => DisplayFormat::Date,
            _ => DisplayFormat::Plain,
        };
        Self {
            name,
            label,
            kind,
            display,
            required: true,
            positive: None,
        }
    }

    /// Required free-text field.
    #[must_use]
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    /// Required e-mail field.
    #[must_use]
    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    /// Required telephone field.
    #[must_use]
    pub const fn phone(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Phone)
    }

    /// Required numeric field.
    #[must_use]
    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    /// Required date field, displayed as `dd/mm/yyyy`.
    #[must_use]
    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    /// Show the value with a `$` prefix.
    #[must_use]
    pub const fn currency(mut self) -> Self {
        self.display = DisplayFormat::Currency;
        self
    }

    /// Require a value strictly greater than zero, alerting `message` otherwise.
    #[must_use]
    pub const fn positive(mut self, message: &'static str) -> Self {
        self.positive = Some(message);
        self
    }
}

/// Ordering rule between two date fields of the same record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    /// Field holding the first date.
    pub start: &'static str,
    /// Field holding the second date; must be strictly later than `start`.
    pub end: &'static str,
    /// Alert shown when the order is violated.
    pub message: &'static str,
}

/// Alerts shown for failed operations on one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMessages {
    /// The table could not be loaded.
    pub load_failed: &'static str,
    /// A new record could not be saved.
    pub save_failed: &'static str,
    /// An existing record could not be updated.
    pub update_failed: &'static str,
    /// A record could not be deleted.
    pub delete_failed: &'static str,
    /// Question asked before deleting a record.
    pub delete_prompt: &'static str,
}

/// Errors raised while assembling a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two fields share the same name.
    #[error("field `{name}` is declared twice in resource `{resource}`")]
    DuplicateField {
        /// Resource slug.
        resource: &'static str,
        /// Repeated field name.
        name: &'static str,
    },
    /// A field name collides with the identifier key.
    #[error("field `_id` is reserved in resource `{resource}`")]
    ReservedField {
        /// Resource slug.
        resource: &'static str,
    },
    /// A date rule points at a field that is missing or not a date.
    #[error("date rule in resource `{resource}` references unknown date field `{name}`")]
    UnknownDateField {
        /// Resource slug.
        resource: &'static str,
        /// Offending field name.
        name: &'static str,
    },
    /// Two resources share the same slug.
    #[error("resource `{slug}` is registered twice")]
    DuplicateResource {
        /// Repeated slug.
        slug: &'static str,
    },
}

/// Description of one CRUD resource.
///
/// ## Invariants
/// - Field names are unique and never `_id`.
/// - A [`DateRange`] only references declared date fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    slug: &'static str,
    title: &'static str,
    fields: Vec<FieldSpec>,
    date_range: Option<DateRange>,
    messages: ResourceMessages,
}

impl ResourceSchema {
    /// Assemble and check a schema.
    ///
    /// # Errors
    /// Returns [`SchemaError`] when the invariants above do not hold.
    pub fn try_new(
        slug: &'static str,
        title: &'static str,
        fields: Vec<FieldSpec>,
        date_range: Option<DateRange>,
        messages: ResourceMessages,
    ) -> Result<Self, SchemaError> {
        for (index, field) in fields.iter().enumerate() {
            if field.name == crate::domain::record::ID_KEY {
                return Err(SchemaError::ReservedField { resource: slug });
            }
            if fields.iter().skip(index + 1).any(|other| other.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    resource: slug,
                    name: field.name,
                });
            }
        }
        if let Some(range) = &date_range {
            for name in [range.start, range.end] {
                let is_date = fields
                    .iter()
                    .any(|field| field.name == name && field.kind == FieldKind::Date);
                if !is_date {
                    return Err(SchemaError::UnknownDateField {
                        resource: slug,
                        name,
                    });
                }
            }
        }
        Ok(Self {
            slug,
            title,
            fields,
            date_range,
            messages,
        })
    }

    /// URL path segment of the resource, shared by the pages and the API.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        self.slug
    }

    /// Page heading and navigation label.
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Fields in column order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Date ordering rule, if the resource has one.
    #[must_use]
    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// Failure alerts and the delete prompt.
    #[must_use]
    pub fn messages(&self) -> &ResourceMessages {
        &self.messages
    }

    /// Hotel staff records.
    ///
    /// # Errors
    /// Never fails in practice; the signature mirrors [`Self::try_new`].
    pub fn employees() -> Result<Self, SchemaError> {
        Self::try_new(
            "empleados",
            "Empleados",
            vec![
                FieldSpec::text("documento", "Documento"),
                FieldSpec::text("nombre", "Nombre"),
                FieldSpec::text("apellido", "Apellido"),
                FieldSpec::email("email", "Email"),
                FieldSpec::phone("telefono", "Teléfono"),
                FieldSpec::text("cargo", "Cargo"),
                FieldSpec::number("salario", "Salario")
                    .currency()
                    .positive("El salario debe ser un número positivo."),
                FieldSpec::date("fecha_entrada", "Entrada"),
            ],
            None,
            ResourceMessages {
                load_failed: "No se pudieron cargar los empleados.",
                save_failed: "No se pudo guardar el empleado.",
                update_failed: "No se pudo actualizar.",
                delete_failed: "No se pudo eliminar.",
                delete_prompt: "¿Seguro que deseas eliminar este empleado?",
            },
        )
    }

    /// Stock items.
    ///
    /// # Errors
    /// Never fails in practice; the signature mirrors [`Self::try_new`].
    pub fn inventory() -> Result<Self, SchemaError> {
        Self::try_new(
            "inventarios",
            "Inventario",
            vec![
                FieldSpec::text("codigoarticulo", "ID Art."),
                FieldSpec::text("articulo", "Artículo"),
                FieldSpec::text("categoria", "Categoría"),
                FieldSpec::number("existencias", "Existencias"),
                FieldSpec::number("precio", "Valor unitario")
                    .positive("El artículo debe tener un precio de compra."),
            ],
            None,
            ResourceMessages {
                load_failed: "No se pudieron cargar los inventarios.",
                save_failed: "No se pudo guardar el item de inventario.",
                update_failed: "No se pudo actualizar.",
                delete_failed: "No se pudo eliminar.",
                delete_prompt: "¿Seguro que deseas eliminar este artículo?",
            },
        )
    }

    /// Room bookings.
    ///
    /// # Errors
    /// Never fails in practice; the signature mirrors [`Self::try_new`].
    pub fn reservations() -> Result<Self, SchemaError> {
        Self::try_new(
            "reservaciones",
            "Reservaciones",
            vec![
                FieldSpec::text("nombre", "Nombre"),
                FieldSpec::text("apellido", "Apellido"),
                FieldSpec::phone("telefono", "Teléfono"),
                FieldSpec::text("habitacion", "Habitación"),
                FieldSpec::date("fecha_entrada", "Entrada"),
                FieldSpec::date("fecha_salida", "Salida"),
                FieldSpec::number("precio", "Precio")
                    .currency()
                    .positive("El precio debe ser un número positivo."),
            ],
            Some(DateRange {
                start: "fecha_entrada",
                end: "fecha_salida",
                message: "La fecha de entrada debe ser anterior a la fecha de salida.",
            }),
            ResourceMessages {
                load_failed: "No se pudieron cargar las reservaciones.",
                save_failed: "No se pudo guardar la reservación.",
                update_failed: "No se pudo actualizar.",
                delete_failed: "No se pudo eliminar.",
                delete_prompt: "¿Seguro que deseas eliminar esta reservación?",
            },
        )
    }
}

/// Ordered set of resources served by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCatalog {
    resources: Vec<ResourceSchema>,
}

impl ResourceCatalog {
    /// Build a catalogue, rejecting duplicate slugs.
    ///
    /// # Errors
    /// Returns [`SchemaError::DuplicateResource`] when two schemas share a slug.
    pub fn try_new(resources: Vec<ResourceSchema>) -> Result<Self, SchemaError> {
        for (index, schema) in resources.iter().enumerate() {
            if resources
                .iter()
                .skip(index + 1)
                .any(|other| other.slug == schema.slug)
            {
                return Err(SchemaError::DuplicateResource { slug: schema.slug });
            }
        }
        Ok(Self { resources })
    }

    /// Employees, inventory and reservations, in navigation order.
    ///
    /// # Errors
    /// Propagates [`SchemaError`] from the built-in schemas.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::try_new(vec![
            ResourceSchema::employees()?,
            ResourceSchema::inventory()?,
            ResourceSchema::reservations()?,
        ])
    }

    /// Find a resource by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&ResourceSchema> {
        self.resources.iter().find(|schema| schema.slug == slug)
    }

    /// Resources in navigation order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceSchema> {
        self.resources.iter()
    }
}
