use std::fmt::Display;

/// Collects counts of variables in the model
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub num_constants: usize,
    pub num_parameters: usize,
    pub num_discrete: usize,
    pub num_continuous: usize,
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_local: usize,
    pub num_independent: usize,
    pub num_calculated_parameters: usize,
    pub num_real_vars: usize,
    pub num_integer_vars: usize,
    pub num_enum_vars: usize,
    pub num_bool_vars: usize,
    pub num_string_vars: usize,
}

impl Counts {
    /// Label/value pairs in display order, used for table output.
    pub fn rows(&self) -> [(&'static str, usize); 14] {
        [
            ("Constants", self.num_constants),
            ("Parameters", self.num_parameters),
            ("Discrete", self.num_discrete),
            ("Continuous", self.num_continuous),
            ("Inputs", self.num_inputs),
            ("Outputs", self.num_outputs),
            ("Local", self.num_local),
            ("Independent", self.num_independent),
            ("Calculated parameters", self.num_calculated_parameters),
            ("Real", self.num_real_vars),
            ("Integer", self.num_integer_vars),
            ("Enumeration", self.num_enum_vars),
            ("Boolean", self.num_bool_vars),
            ("String", self.num_string_vars),
        ]
    }
}

impl Display for Counts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Variable Counts");
        for (label, count) in self.rows() {
            s.field(label, &count);
        }
        s.finish()
    }
}

pub trait VariableCounts {
    fn model_counts(&self) -> Counts;
}
