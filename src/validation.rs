use thiserror::Error;

use crate::node::{PortDataType, PortDirection, PortRef};
use crate::system::NodeSystem;

// ============================================================================
// Connection Validation Framework
// ============================================================================

/// Result of connection validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Connection is valid
    Valid,
    /// Connection is invalid with a reason
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Check if the result is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }

    /// Convert into a `Result`, for use with `?`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(err) => Err(err),
        }
    }
}

/// Reasons why a connection validation failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Both ports belong to the same node
    #[error("Cannot connect a node to itself")]
    SameNode,
    /// The drag did not start on an output port
    #[error("Source port must be an output")]
    SourceNotOutput,
    /// The drop target is not an input port
    #[error("Target port must be an input")]
    TargetNotInput,
    /// A connection between these ports already exists
    #[error("Connection already exists")]
    DuplicateConnection,
    /// Port (or its node) does not exist in the graph
    #[error("{} port {} not found on node {}", .0.direction, .0.port_id, .0.node_id)]
    PortNotFound(PortRef),
    /// Data types are incompatible
    #[error("Type mismatch: cannot connect {from} to {to}")]
    TypeMismatch { from: PortDataType, to: PortDataType },
    /// Custom validation failure
    #[error("{0}")]
    Custom(String),
}

/// Trait for application-level connection rules.
///
/// Validators run before [`NodeSystem::create_connection`], which itself only
/// enforces id uniqueness and acyclicity. Compose several with
/// [`CompositeValidator`].
///
/// # Example
///
/// ```
/// use slint_node_system::{
///     ConnectionValidator, NodeSystem, PortRef, ValidationError, ValidationResult,
/// };
///
/// /// Allow at most one connection per output port.
/// struct SingleFanOut;
///
/// impl ConnectionValidator for SingleFanOut {
///     fn validate(&self, from: &PortRef, _to: &PortRef, system: &NodeSystem) -> ValidationResult {
///         let port = Some(from.port_id.as_str());
///         if system.connections().outputs_of(&from.node_id, port).is_empty() {
///             ValidationResult::Valid
///         } else {
///             let reason = "Output already connected".to_string();
///             ValidationResult::Invalid(ValidationError::Custom(reason))
///         }
///     }
/// }
/// ```
pub trait ConnectionValidator {
    /// Check if a connection from `from` to `to` is allowed in `system`.
    fn validate(&self, from: &PortRef, to: &PortRef, system: &NodeSystem) -> ValidationResult;
}

/// Default validator: checks basic I/O compatibility
///
/// This validator implements the standard rules:
/// 1. Ports must be on different nodes
/// 2. The source must be an output, the target an input
/// 3. Both ports must exist
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicConnectionValidator;

impl ConnectionValidator for BasicConnectionValidator {
    fn validate(&self, from: &PortRef, to: &PortRef, system: &NodeSystem) -> ValidationResult {
        if from.node_id == to.node_id {
            return ValidationResult::Invalid(ValidationError::SameNode);
        }
        if from.direction != PortDirection::Output {
            return ValidationResult::Invalid(ValidationError::SourceNotOutput);
        }
        if to.direction != PortDirection::Input {
            return ValidationResult::Invalid(ValidationError::TargetNotInput);
        }

        match port_data_type(from, system).and(port_data_type(to, system)) {
            Ok(_) => ValidationResult::Valid,
            Err(err) => ValidationResult::Invalid(err),
        }
    }
}

/// Validator that prevents duplicate connections between the same ports.
///
/// Direction matters: the reverse pair is not a duplicate.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDuplicatesValidator;

impl ConnectionValidator for NoDuplicatesValidator {
    fn validate(&self, from: &PortRef, to: &PortRef, system: &NodeSystem) -> ValidationResult {
        if system.connection_exists(from, to) {
            ValidationResult::Invalid(ValidationError::DuplicateConnection)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Opt-in check of port data type tags. `Any` matches everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataTypeValidator;

impl ConnectionValidator for DataTypeValidator {
    fn validate(&self, from: &PortRef, to: &PortRef, system: &NodeSystem) -> ValidationResult {
        let types = port_data_type(from, system)
            .and_then(|a| port_data_type(to, system).map(|b| (a, b)));
        match types {
            Ok((a, b)) if a.is_compatible_with(b) => ValidationResult::Valid,
            Ok((a, b)) => {
                ValidationResult::Invalid(ValidationError::TypeMismatch { from: a, to: b })
            }
            Err(err) => ValidationResult::Invalid(err),
        }
    }
}

/// Composite validator that combines multiple validators
///
/// All validators must return Valid for the connection to be valid (AND
/// logic). Returns the first error encountered.
///
/// # Example
///
/// ```
/// use slint_node_system::{
///     BasicConnectionValidator, CompositeValidator, DataTypeValidator, NoDuplicatesValidator,
/// };
///
/// let validator = CompositeValidator::new()
///     .add(BasicConnectionValidator)
///     .add(NoDuplicatesValidator)
///     .add(DataTypeValidator);
/// assert_eq!(validator.len(), 3);
/// ```
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn ConnectionValidator>>,
}

impl CompositeValidator {
    /// Create a new empty composite validator
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules an interactive editor applies before committing a drag:
    /// [`BasicConnectionValidator`] then [`NoDuplicatesValidator`].
    pub fn standard() -> Self {
        Self::new().add(BasicConnectionValidator).add(NoDuplicatesValidator)
    }

    /// Add a validator to the composite
    ///
    /// Validators are checked in the order they were added.
    pub fn add<V: ConnectionValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl ConnectionValidator for CompositeValidator {
    fn validate(&self, from: &PortRef, to: &PortRef, system: &NodeSystem) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(from, to, system);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

/// Convenience function to validate a connection with any validator
///
/// ```ignore
/// match validate_connection(&from, &to, &system, &CompositeValidator::standard()) {
///     ValidationResult::Valid => { system.create_connection(&from, &to, None)?; }
///     ValidationResult::Invalid(err) => log::warn!("Cannot connect: {}", err),
/// }
/// ```
pub fn validate_connection<V>(
    from: &PortRef,
    to: &PortRef,
    system: &NodeSystem,
    validator: &V,
) -> ValidationResult
where
    V: ConnectionValidator + ?Sized,
{
    validator.validate(from, to, system)
}

fn port_data_type(port: &PortRef, system: &NodeSystem) -> Result<PortDataType, ValidationError> {
    system
        .get_node(&port.node_id)
        .ok()
        .and_then(|node| node.port(port.direction, &port.port_id))
        .map(|p| p.data_type)
        .ok_or_else(|| ValidationError::PortNotFound(port.clone()))
}

// ============================================================================
// Tests
// ============================================================================
