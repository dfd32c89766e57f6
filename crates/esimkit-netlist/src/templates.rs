//! Built-in example netlists.

/// Names accepted by [`netlist_template`].
pub const TEMPLATE_NAMES: [&str; 2] = ["voltage_divider", "rc_filter"];

const VOLTAGE_DIVIDER: &str = "\
* 10 V across two 1k resistors
.title Voltage Divider
V1 1 0 DC 10V
R1 1 2 1k
R2 2 0 1k
.op
.end
";

const RC_FILTER: &str = "\
* First-order low pass, corner near 159 Hz
.title RC Filter
V1 1 0 AC 1V
R1 1 2 1k
C1 2 0 1u
.ac dec 10 1 1Meg
.end
";

/// Look up an example netlist by name.
pub fn netlist_template(name: &str) -> Option<&'static str> {
    match name {
        "voltage_divider" => Some(VOLTAGE_DIVIDER),
        "rc_filter" => Some(RC_FILTER),
        _ => None,
    }
}
