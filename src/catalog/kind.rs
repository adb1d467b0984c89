use crate::graph::Literal;
use std::fmt;

/// The data type carried by a slot. Links are only accepted between equal types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Model,
    Clip,
    Vae,
    Conditioning,
    Latent,
    Image,
    MotionModel,
    Int,
    Float,
    String,
    Boolean,
    /// Any type the built-in set does not know about, by its engine name.
    Custom(std::string::String),
}

impl DataType {
    /// The type name used by the execution engine and the UI link table.
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Model => "MODEL",
            DataType::Clip => "CLIP",
            DataType::Vae => "VAE",
            DataType::Conditioning => "CONDITIONING",
            DataType::Latent => "LATENT",
            DataType::Image => "IMAGE",
            DataType::MotionModel => "MOTION_MODEL_ADE",
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::String => "STRING",
            DataType::Boolean => "BOOLEAN",
            DataType::Custom(name) => name,
        }
    }

    /// Whether a literal of this shape may be stored in a slot of this type.
    ///
    /// Non-finite floats are refused by every type, including custom ones.
    pub fn accepts(&self, literal: &Literal) -> bool {
        if !literal.is_finite() {
            return false;
        }
        match (self, literal) {
            (DataType::Int, Literal::Int(_)) => true,
            (DataType::Float, Literal::Float(_) | Literal::Int(_)) => true,
            (DataType::String, Literal::String(_)) => true,
            (DataType::Boolean, Literal::Bool(_)) => true,
            (DataType::Custom(_), _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed input slot on a node kind.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSlot {
    pub name: String,
    pub data_type: DataType,
    /// Widget slots take literal values; non-widget slots only take links.
    pub widget: bool,
    /// Seed widgets get an extra "control after generate" value in the UI form.
    pub seed_control: bool,
}

impl InputSlot {
    /// A slot that must be fed by another node's output.
    pub fn link(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            widget: false,
            seed_control: false,
        }
    }

    /// A slot that holds a literal value (it may still be fed by a link).
    pub fn widget(name: &str, data_type: DataType) -> Self {
        Self {
            widget: true,
            ..Self::link(name, data_type)
        }
    }

    /// A seed widget.
    pub fn seed(name: &str, data_type: DataType) -> Self {
        Self {
            seed_control: true,
            ..Self::widget(name, data_type)
        }
    }
}

/// A named, typed output slot on a node kind.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSlot {
    pub name: String,
    pub data_type: DataType,
}

impl OutputSlot {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
        }
    }
}

/// An immutable descriptor of one operation the execution engine understands.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeKind {
    name: String,
    inputs: Vec<InputSlot>,
    outputs: Vec<OutputSlot>,
    default_size: [f64; 2],
}

impl NodeKind {
    pub const DEFAULT_SIZE: [f64; 2] = [315.0, 98.0];

    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            default_size: Self::DEFAULT_SIZE,
        }
    }

    pub fn with_input(mut self, slot: InputSlot) -> Self {
        self.inputs.push(slot);
        self
    }

    pub fn with_output(mut self, name: &str, data_type: DataType) -> Self {
        self.outputs.push(OutputSlot::new(name, data_type));
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.default_size = [width, height];
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input slots in declaration order.
    pub fn inputs(&self) -> &[InputSlot] {
        &self.inputs
    }

    /// Output slots in declaration order; the position is the slot index.
    pub fn outputs(&self) -> &[OutputSlot] {
        &self.outputs
    }

    pub fn default_size(&self) -> [f64; 2] {
        self.default_size
    }

    pub fn input(&self, name: &str) -> Option<&InputSlot> {
        self.inputs.iter().find(|s| s.name == name)
    }

    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|s| s.name == name)
    }

    pub fn output(&self, index: usize) -> Option<&OutputSlot> {
        self.outputs.get(index)
    }
}
