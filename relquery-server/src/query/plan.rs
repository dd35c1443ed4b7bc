//! Descriptor resolution and SQL rendering
//!
//! [`Catalog::resolve`] checks a descriptor against the relationship graph
//! and produces a [`Plan`]. Plans only hold catalog identifiers, so the SQL
//! they render never contains caller text; filter values are always bound.

use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, Row};

use crate::catalog::{
    Catalog, EntityDef, FieldDef, FieldType, RelationshipDef, PATH_SEPARATOR, PRIMARY_KEY,
};
use crate::error::{GatewayError, Result};

use super::descriptor::{JoinKind, Operator, Predicate, QueryDescriptor};
use super::{Record, Value};

const ROOT_ALIAS: &str = "r";
const JOINED_ALIAS: &str = "j";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Root,
    Joined,
}

impl Side {
    fn alias(&self) -> &'static str {
        match self {
            Self::Root => ROOT_ALIAS,
            Self::Joined => JOINED_ALIAS,
        }
    }
}

/// One projected output column.
#[derive(Debug, Clone)]
pub struct PlanColumn {
    key: String,
    side: Side,
    column: &'static str,
    ty: FieldType,
}

impl PlanColumn {
    fn root(field: &FieldDef) -> Self {
        Self {
            key: field.name.to_owned(),
            side: Side::Root,
            column: field.name,
            ty: field.ty,
        }
    }

    fn joined(rel: &RelationshipDef, field: &FieldDef) -> Self {
        Self {
            key: format!("{}{}{}", rel.name, PATH_SEPARATOR, field.name),
            side: Side::Joined,
            column: field.name,
            ty: field.ty,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ty(&self) -> FieldType {
        self.ty
    }
}

#[derive(Debug, Clone)]
struct PlanJoin {
    kind: JoinKind,
    table: &'static str,
    on: (&'static str, &'static str),
}

#[derive(Debug, Clone)]
struct PlanFilter {
    field: &'static str,
    ty: FieldType,
    op: Operator,
    value: Value,
}

/// A descriptor resolved against the catalog, ready to execute.
#[derive(Debug, Clone)]
pub struct Plan {
    entity: &'static str,
    table: &'static str,
    join: Option<PlanJoin>,
    filter: Option<PlanFilter>,
    columns: Vec<PlanColumn>,
}

impl Catalog {
    /// Resolve a descriptor into an executable plan.
    ///
    /// # Errors
    ///
    /// - `UnknownEntity` if the root entity is not in the catalog
    /// - `RelationshipNotFound` if the join path does not start at the root
    /// - `UnknownField` for filter fields or projected keys that do not resolve
    /// - `UnsupportedPredicate` for unknown operators or operators that do
    ///   not apply to the field type
    /// - `TypeMismatch` if the filter value does not fit the field
    pub fn resolve(&self, descriptor: &QueryDescriptor) -> Result<Plan> {
        let root = self
            .entity(&descriptor.entity)
            .ok_or_else(|| GatewayError::UnknownEntity(descriptor.entity.clone()))?;

        let joined = match &descriptor.join {
            Some(path) => {
                let rel = self.relationship(root.name, &path.relationship).ok_or_else(|| {
                    GatewayError::RelationshipNotFound {
                        entity: root.name.to_owned(),
                        name: path.relationship.clone(),
                    }
                })?;
                let target = self
                    .entity(rel.to)
                    .ok_or_else(|| GatewayError::UnknownEntity(rel.to.to_owned()))?;
                Some((path.kind, rel, target))
            }
            None => None,
        };

        let filter = descriptor
            .filter
            .as_ref()
            .map(|p| resolve_predicate(root, p))
            .transpose()?;

        let columns = resolve_columns(
            root,
            joined.map(|(_, rel, target)| (rel, target)),
            &descriptor.fields,
        )?;

        Ok(Plan {
            entity: root.name,
            table: root.table,
            join: joined.map(|(kind, rel, target)| PlanJoin {
                kind,
                table: target.table,
                on: rel.join_columns(),
            }),
            filter,
            columns,
        })
    }
}

fn coerce(field: &'static str, ty: FieldType, value: &Value) -> Result<Value> {
    value.coerce_to(ty).ok_or_else(|| GatewayError::TypeMismatch {
        field: field.to_owned(),
        expected: ty.as_str(),
        found: value.type_name(),
    })
}

fn resolve_predicate(root: &EntityDef, predicate: &Predicate) -> Result<PlanFilter> {
    let field = root
        .get_field(&predicate.field)
        .ok_or_else(|| GatewayError::unknown_field(root.name, &predicate.field))?;

    let op = Operator::parse(&predicate.op).ok_or_else(|| {
        GatewayError::unsupported(field.name, format!("unknown operator '{}'", predicate.op))
    })?;
    if !op.supports(field.ty) {
        return Err(GatewayError::unsupported(
            field.name,
            format!("'{}' is not defined for {} fields", op.as_str(), field.ty.as_str()),
        ));
    }

    Ok(PlanFilter {
        field: field.name,
        ty: field.ty,
        op,
        value: coerce(field.name, field.ty, &predicate.value)?,
    })
}

fn resolve_columns(
    root: &EntityDef,
    joined: Option<(&RelationshipDef, &EntityDef)>,
    fields: &[String],
) -> Result<Vec<PlanColumn>> {
    if fields.is_empty() {
        let mut columns: Vec<PlanColumn> = root.fields.iter().map(PlanColumn::root).collect();
        if let Some((rel, target)) = joined {
            columns.extend(target.fields.iter().map(|f| PlanColumn::joined(rel, f)));
        }
        return Ok(columns);
    }

    let mut columns: Vec<PlanColumn> = Vec::with_capacity(fields.len());
    for name in fields {
        if columns.iter().any(|c| &c.key == name) {
            continue;
        }

        let column = match name.split_once(PATH_SEPARATOR) {
            Some((rel_name, field_name)) => {
                let (rel, target) = joined
                    .filter(|(rel, _)| rel.name == rel_name)
                    .ok_or_else(|| GatewayError::unknown_field(root.name, name))?;
                let field = target
                    .get_field(field_name)
                    .ok_or_else(|| GatewayError::unknown_field(target.name, field_name))?;
                PlanColumn::joined(rel, field)
            }
            None => {
                let field = root
                    .get_field(name)
                    .ok_or_else(|| GatewayError::unknown_field(root.name, name))?;
                PlanColumn::root(field)
            }
        };
        columns.push(column);
    }
    Ok(columns)
}

fn comparison(op: Operator) -> Option<&'static str> {
    match op {
        Operator::Eq => Some("="),
        Operator::Ne => Some("<>"),
        Operator::Lt => Some("<"),
        Operator::Le => Some("<="),
        Operator::Gt => Some(">"),
        Operator::Ge => Some(">="),
        Operator::Contains => None,
    }
}

impl Plan {
    /// Root entity name.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn columns(&self) -> &[PlanColumn] {
        &self.columns
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Copy of this plan with a new filter value, type-checked against the
    /// filtered field.
    pub fn bind_filter(&self, value: impl Into<Value>) -> Result<Plan> {
        let filter = self
            .filter
            .as_ref()
            .ok_or_else(|| {
                GatewayError::Query(format!("{} plan has no filter to bind", self.entity))
            })?;

        let value = coerce(filter.field, filter.ty, &value.into())?;
        let mut plan = self.clone();
        plan.filter = Some(PlanFilter {
            value,
            ..filter.clone()
        });
        Ok(plan)
    }

    pub(crate) fn to_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new("SELECT ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(format!("{}.\"{}\"", col.side.alias(), col.column));
        }

        qb.push(format!(" FROM \"{}\" AS {ROOT_ALIAS}", self.table));

        if let Some(join) = &self.join {
            qb.push(format!(
                " {} \"{}\" AS {JOINED_ALIAS} ON {ROOT_ALIAS}.\"{}\" = {JOINED_ALIAS}.\"{}\"",
                join.kind.sql(),
                join.table,
                join.on.0,
                join.on.1,
            ));
        }

        if let Some(filter) = &self.filter {
            let column = format!("{ROOT_ALIAS}.\"{}\"", filter.field);
            qb.push(" WHERE ");
            match comparison(filter.op) {
                Some(symbol) => {
                    qb.push(format!("{column} {symbol} "));
                    filter.value.push_bind(&mut qb);
                }
                None => {
                    qb.push(format!("instr({column}, "));
                    filter.value.push_bind(&mut qb);
                    qb.push(") > 0");
                }
            }
        }

        qb.push(format!(" ORDER BY {ROOT_ALIAS}.\"{PRIMARY_KEY}\""));
        if self.join.is_some() {
            qb.push(format!(", {JOINED_ALIAS}.\"{PRIMARY_KEY}\""));
        }
        qb
    }

    pub(crate) fn decode(&self, row: &SqliteRow) -> Result<Record> {
        let mut record = Record::with_capacity(self.columns.len());
        for (idx, col) in self.columns.iter().enumerate() {
            let value: Value = match col.ty {
                FieldType::Integer => row.try_get::<Option<i64>, _>(idx)?.into(),
                FieldType::Real => row.try_get::<Option<f64>, _>(idx)?.into(),
                FieldType::Text => row.try_get::<Option<String>, _>(idx)?.into(),
                FieldType::Boolean => row.try_get::<Option<bool>, _>(idx)?.into(),
            };
            record.push(col.key.clone(), value);
        }
        Ok(record)
    }
}
