use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};
use sinkdestroy::{
    is_valid_addition, occupied_cells, random_fleet, validate_fleet, validate_placement, Cell,
    Orientation, Placement, BOARD_SIZE, SHIPS,
};

fn orientation() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn cells_form_contiguous_run(idx in 0..SHIPS.len(), x in 0..BOARD_SIZE, y in 0..BOARD_SIZE, o in orientation()) {
        let ship = SHIPS[idx];
        let p = Placement::new(ship, x, y, o);
        let cells = occupied_cells(&p);
        prop_assert_eq!(cells.len() as i32, ship.length());
        for (i, c) in cells.iter().enumerate() {
            let expected = match o {
                Orientation::Horizontal => Cell::new(x + i as i32, y),
                Orientation::Vertical => Cell::new(x, y + i as i32),
            };
            prop_assert_eq!(*c, expected);
        }
        // On the board exactly when every cell is.
        prop_assert_eq!(validate_placement(&p).is_ok(), cells.iter().all(|c| c.in_bounds()));
    }

    #[test]
    fn random_fleets_are_valid(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let fleet = random_fleet(&mut rng);
        prop_assert_eq!(validate_fleet(&fleet), Ok(()));
    }

    #[test]
    fn addition_ignores_existing_order(seed in any::<u64>(), idx in 0..SHIPS.len(), x in 0..BOARD_SIZE, y in 0..BOARD_SIZE, o in orientation()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let fleet = random_fleet(&mut rng);
        let candidate = Placement::new(SHIPS[idx], x, y, o);
        let reversed: Vec<Placement> = fleet.iter().rev().copied().collect();
        let overlaps = fleet.iter().any(|p| p.overlaps(&candidate));
        prop_assert_eq!(is_valid_addition(&candidate, &fleet), is_valid_addition(&candidate, &reversed));
        if overlaps {
            prop_assert!(!is_valid_addition(&candidate, &fleet));
        }
    }
}
