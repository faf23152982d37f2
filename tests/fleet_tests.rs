mod common;

use common::standard_fleet;
use sinkdestroy::{
    is_valid_addition, next_ship_to_place, occupied_cells, placement_preview, validate_fleet,
    validate_identifiers, validate_placement, validate_target_cell, Cell, Orientation, Placement,
    ShipType, ValidationError,
};

#[test]
fn occupied_cells_run_along_orientation() {
    let h = Placement::new(ShipType::Carrier, 2, 3, Orientation::Horizontal);
    assert_eq!(
        occupied_cells(&h),
        vec![
            Cell::new(2, 3),
            Cell::new(3, 3),
            Cell::new(4, 3),
            Cell::new(5, 3),
            Cell::new(6, 3)
        ]
    );
    let v = Placement::new(ShipType::PatrolBoat, 7, 8, Orientation::Vertical);
    assert_eq!(occupied_cells(&v), vec![Cell::new(7, 8), Cell::new(7, 9)]);
}

#[test]
fn placement_bounds() {
    let edge = Placement::new(ShipType::Carrier, 5, 9, Orientation::Horizontal);
    assert_eq!(validate_placement(&edge), Ok(()));

    let over = Placement::new(ShipType::Carrier, 6, 0, Orientation::Horizontal);
    assert_eq!(
        validate_placement(&over),
        Err(ValidationError::OutOfBounds("Carrier"))
    );

    let down = Placement::new(ShipType::Battleship, 0, 7, Orientation::Vertical);
    assert_eq!(
        validate_placement(&down),
        Err(ValidationError::OutOfBounds("Battleship"))
    );

    let negative = Placement::new(ShipType::Submarine, -1, 0, Orientation::Vertical);
    assert_eq!(
        validate_placement(&negative),
        Err(ValidationError::NegativePosition("Submarine"))
    );
    assert_eq!(
        validate_placement(&negative).unwrap_err().to_string(),
        "Submarine position cannot be negative"
    );
}

#[test]
fn huge_origins_are_out_of_bounds() {
    let far: Placement = "Carrier,2147483647,0,horizontal".parse().unwrap();
    assert_eq!(validate_placement(&far), Err(ValidationError::OutOfBounds("Carrier")));

    let low = Placement::new(ShipType::PatrolBoat, 0, i32::MAX, Orientation::Vertical);
    assert_eq!(validate_placement(&low), Err(ValidationError::OutOfBounds("PatrolBoat")));
    assert!(!is_valid_addition(&low, &standard_fleet()));

    let mut fleet = standard_fleet();
    fleet[0] = Placement::new(ShipType::Carrier, i32::MAX, i32::MAX, Orientation::Horizontal);
    assert_eq!(validate_fleet(&fleet), Err(ValidationError::OutOfBounds("Carrier")));
}

#[test]
fn parse_rejects_unknown_type_and_orientation() {
    assert_eq!(
        Placement::parse("Rowboat", 0, 0, "horizontal"),
        Err(ValidationError::UnknownShipType("Rowboat".to_string()))
    );
    let err = Placement::parse("Carrier", 0, 0, "diagonal").unwrap_err();
    assert_eq!(err.to_string(), "Invalid orientation for Carrier: diagonal");

    let ok: Placement = "PatrolBoat, 3, 4, vertical".parse().unwrap();
    assert_eq!(ok, Placement::new(ShipType::PatrolBoat, 3, 4, Orientation::Vertical));
    assert!(matches!(
        "Carrier,0,horizontal".parse::<Placement>(),
        Err(ValidationError::MalformedPlacement(_))
    ));
}

#[test]
fn accepts_standard_fleet() {
    assert_eq!(validate_fleet(&standard_fleet()), Ok(()));
}

#[test]
fn rejects_missing_type() {
    let mut fleet = standard_fleet();
    fleet.pop();
    let err = validate_fleet(&fleet).unwrap_err();
    assert_eq!(err, ValidationError::MissingShipTypes);
    assert_eq!(
        err.to_string(),
        "Must place all ship types: Carrier, Battleship, Destroyer, Submarine, PatrolBoat"
    );
    assert_eq!(validate_fleet(&[]), Err(ValidationError::MissingShipTypes));
}

#[test]
fn rejects_duplicate_type() {
    let mut fleet = standard_fleet();
    fleet.push(Placement::new(ShipType::PatrolBoat, 0, 9, Orientation::Horizontal));
    assert_eq!(validate_fleet(&fleet), Err(ValidationError::DuplicateShipType));
}

#[test]
fn rejects_out_of_bounds_member() {
    let mut fleet = standard_fleet();
    fleet[4] = Placement::new(ShipType::PatrolBoat, 9, 9, Orientation::Horizontal);
    assert_eq!(
        validate_fleet(&fleet),
        Err(ValidationError::OutOfBounds("PatrolBoat"))
    );
}

#[test]
fn rejects_overlap() {
    let mut fleet = standard_fleet();
    // Crosses the carrier at (1, 0).
    fleet[4] = Placement::new(ShipType::PatrolBoat, 1, 0, Orientation::Vertical);
    assert_eq!(validate_fleet(&fleet), Err(ValidationError::Overlap));
}

#[test]
fn incremental_addition() {
    let fleet = standard_fleet();
    let existing = &fleet[..2];
    let clash = Placement::new(ShipType::Destroyer, 4, 0, Orientation::Vertical);
    let free = Placement::new(ShipType::Destroyer, 5, 0, Orientation::Vertical);
    let off_board = Placement::new(ShipType::Destroyer, 9, 8, Orientation::Vertical);

    assert!(!is_valid_addition(&clash, existing));
    assert!(is_valid_addition(&free, existing));
    assert!(!is_valid_addition(&off_board, existing));
    assert!(is_valid_addition(&free, &[]));

    let reversed: Vec<Placement> = existing.iter().rev().copied().collect();
    assert!(!is_valid_addition(&clash, &reversed));
    assert!(is_valid_addition(&free, &reversed));
}

#[test]
fn identifiers() {
    assert_eq!(
        validate_identifiers("ab", "xyz"),
        Err(ValidationError::PlayerIdTooShort)
    );
    assert_eq!(
        validate_identifiers("abc", "xy"),
        Err(ValidationError::GameKeyTooShort)
    );
    assert_eq!(validate_identifiers("abc", "xyz"), Ok(()));
    // Player id is reported first when both are short.
    assert_eq!(
        validate_identifiers("a", "b"),
        Err(ValidationError::PlayerIdTooShort)
    );
}

#[test]
fn target_cells() {
    assert_eq!(validate_target_cell(0, 0), Ok(()));
    assert_eq!(validate_target_cell(9, 9), Ok(()));
    assert_eq!(
        validate_target_cell(10, 0),
        Err(ValidationError::TargetOutOfRange(Cell::new(10, 0)))
    );
    let err = validate_target_cell(3, -1).unwrap_err();
    assert_eq!(err.to_string(), "Coordinates (3, -1) are outside the game grid (0-9)");
}

#[test]
fn placement_order_and_preview() {
    let fleet = standard_fleet();
    assert_eq!(next_ship_to_place(&[]), Some(ShipType::Carrier));
    assert_eq!(next_ship_to_place(&fleet[..3]), Some(ShipType::Submarine));
    assert_eq!(next_ship_to_place(&fleet), None);

    let preview = placement_preview(8, 8, ShipType::Destroyer, Orientation::Horizontal);
    assert_eq!(preview, vec![Cell::new(8, 8), Cell::new(9, 8), Cell::new(10, 8)]);
    assert_eq!(Orientation::Horizontal.rotated(), Orientation::Vertical);
    assert!(ShipType::Carrier.description().starts_with("Aircraft Carrier (5 spaces)"));
}
