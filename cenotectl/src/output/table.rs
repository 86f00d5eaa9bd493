use tabled::{Table, settings::Style};

/// Common styling for the tables printed by this tool
pub(crate) trait CenotectlTable {
    fn styled(&mut self) -> &mut Self;
}

impl CenotectlTable for Table {
    fn styled(&mut self) -> &mut Self {
        self.with(Style::psql())
    }
}
