//! Matching species rows with the cenote and fish rows recorded at the same coordinate
use crate::{
    loader::SurveyTables,
    record::{Coordinate, CoordinateKey, Record},
    table::Table,
};
use std::collections::{HashMap, hash_map::Entry};
use tracing::{debug, trace};

/// Lookup from exact coordinate to the first row of a table recorded there. Rows without a
/// parsable coordinate are not indexed.
#[derive(Debug)]
pub struct CoordinateIndex<'a> {
    table: &'a Table,
    rows: HashMap<CoordinateKey, usize>,
}

impl<'a> CoordinateIndex<'a> {
    pub fn build(table: &'a Table) -> Self {
        let mut rows = HashMap::new();
        for (n, record) in table.records.iter().enumerate() {
            let Some(coordinate) = record.coordinate() else {
                continue;
            };
            match rows.entry(coordinate.key()) {
                Entry::Vacant(entry) => {
                    entry.insert(n);
                }
                Entry::Occupied(first) => {
                    trace!(table = %table.kind(), row = n, first = *first.get(), "Ignoring duplicate coordinate");
                }
            }
        }
        debug!(table = %table.kind(), coordinates = rows.len(), "Indexed table");
        Self { table, rows }
    }

    pub fn get(&self, coordinate: Coordinate) -> Option<&'a Record> {
        self.rows
            .get(&coordinate.key())
            .map(|&n| &self.table.records[n])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A species row together with whatever was recorded at the same coordinate in the other tables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joined<'a> {
    pub coordinate: Coordinate,
    pub species: &'a Record,
    pub cenote: Option<&'a Record>,
    pub fish: Option<&'a Record>,
}

/// Joins every species row that has a parsable coordinate, in file order
pub fn join(tables: &SurveyTables) -> Vec<Joined<'_>> {
    let cenotes = CoordinateIndex::build(&tables.cenotes);
    let fish = CoordinateIndex::build(&tables.fish);
    tables
        .species
        .records
        .iter()
        .filter_map(|species| {
            let coordinate = species.coordinate()?;
            Some(Joined {
                coordinate,
                species,
                cenote: cenotes.get(coordinate),
                fish: fish.get(coordinate),
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::table::{TableKind, TableSchema};
    use test_log::test;

    fn tables(species: &str, cenotes: &str, fish: &str) -> SurveyTables {
        SurveyTables {
            species: Table::parse(species, TableSchema::new(TableKind::Species, ["bird"]))
                .expect("bad species table"),
            cenotes: Table::parse(cenotes, TableSchema::new(TableKind::Cenotes, ["wellA"]))
                .expect("bad cenotes table"),
            fish: Table::parse(fish, TableSchema::new(TableKind::Fish, ["tetra"]))
                .expect("bad fish table"),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let tables = tables(
            "latitude,longitud,bird\n20.0,-89.0,1\n",
            "latitude,longitud,wellA\n20.0,-89.0,0\n20.0,-89.0,1\n",
            "latitude,longitud,tetra\n",
        );
        let joined = join(&tables);
        assert_eq!(joined.len(), 1);
        let cenote = joined[0].cenote.expect("cenote should match");
        assert_eq!(cenote.get("wellA"), Some("0"));
        assert!(joined[0].fish.is_none());
    }

    #[test]
    fn test_join_is_exact() {
        let tables = tables(
            "latitude,longitud,bird\n20.0,-89.0,1\n",
            "latitude,longitud,wellA\n20.0000001,-89.0,1\n",
            "latitude,longitud,tetra\n20.000,-89.000,1\n",
        );
        let joined = join(&tables);
        assert_eq!(joined.len(), 1);
        assert!(joined[0].cenote.is_none());
        // different string representations of the same number still join
        assert!(joined[0].fish.is_some());
    }

    #[test]
    fn test_unparsable_species_rows_are_dropped() {
        let tables = tables(
            "latitude,longitud,bird\n20.0,-89.0,1\nabc,-89.0,1\n21.0,,1\n22.0,-88.0,0\n",
            "latitude,longitud,wellA\nabc,-89.0,1\n",
            "latitude,longitud,tetra\n",
        );
        let joined = join(&tables);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].coordinate, Coordinate::new(20.0, -89.0));
        assert_eq!(joined[1].coordinate, Coordinate::new(22.0, -88.0));
        assert!(joined.iter().all(|j| j.cenote.is_none()));
        assert!(CoordinateIndex::build(&tables.cenotes).is_empty());
    }
}
