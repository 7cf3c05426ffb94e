//! Unit tests for rn-core primitives.

#[cfg(test)]
mod geo {
    use crate::{heading_difference, reverse_heading, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(45.508, -73.561);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(45.0, -73.5);
        let b = GeoPoint::new(46.0, -73.5);
        let d = a.distance_m(b);
        assert!((d - 111_200.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn heading_cardinals() {
        let o = GeoPoint::new(45.5, -73.5);
        let east = GeoPoint::new(45.5, -73.4);
        let north = GeoPoint::new(45.6, -73.5);
        let west = GeoPoint::new(45.5, -73.6);
        let south = GeoPoint::new(45.4, -73.5);

        assert!(o.heading_to(east).abs() < 1.0);
        assert!((o.heading_to(north) - 90.0).abs() < 1.0);
        assert!((o.heading_to(west).abs() - 180.0).abs() < 1.0);
        assert!((o.heading_to(south) + 90.0).abs() < 1.0);
    }

    #[test]
    fn heading_third_quadrant() {
        // south-west travel lands in (-180, -90)
        let o = GeoPoint::new(45.5, -73.5);
        let sw = GeoPoint::new(45.4, -73.6);
        let h = o.heading_to(sw);
        assert!(h < -90.0 && h > -180.0, "got {h}");
    }

    #[test]
    fn offset_north_by_100m() {
        let p = GeoPoint::new(45.5, -73.5);
        let q = p.offset_by(0.0, 100.0);
        assert!((p.distance_m(q) - 100.0).abs() < 0.1);
        assert!(q.lat > p.lat);
        assert!((q.lon - p.lon).abs() < 1e-9);
    }

    #[test]
    fn intermediate_midpoint() {
        let a = GeoPoint::new(45.5, -73.5);
        let b = GeoPoint::new(45.6, -73.4);
        let m = a.intermediate(b, 0.5);
        assert!((a.distance_m(m) - b.distance_m(m)).abs() < 0.5);
    }

    #[test]
    fn reverse_and_difference() {
        assert_eq!(reverse_heading(90.0), -90.0);
        assert_eq!(reverse_heading(-45.0), 135.0);
        assert!((heading_difference(170.0, -170.0) - 20.0).abs() < 1e-9);
        assert!((heading_difference(10.0, 350.0) - 20.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod compass {
    use crate::{moving_direction, movement_index, CompassDirection, Turn, MOVEMENT_TABLE};

    #[test]
    fn quadrants_from_heading() {
        // heading is the direction of travel; quadrant is where it comes FROM
        assert_eq!(CompassDirection::from_heading(0.0), CompassDirection::West);
        assert_eq!(CompassDirection::from_heading(90.0), CompassDirection::South);
        assert_eq!(CompassDirection::from_heading(-90.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_heading(180.0), CompassDirection::East);
        assert_eq!(CompassDirection::from_heading(-179.0), CompassDirection::East);
    }

    #[test]
    fn quadrant_boundaries() {
        assert_eq!(CompassDirection::from_heading(45.0), CompassDirection::West);
        assert_eq!(CompassDirection::from_heading(45.1), CompassDirection::South);
        assert_eq!(CompassDirection::from_heading(-45.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_heading(-44.9), CompassDirection::West);
    }

    #[test]
    fn table_is_total_over_quadrant_pairs() {
        use CompassDirection::*;
        for up in [North, South, East, West] {
            for down in [North, South, East, West] {
                assert!(
                    moving_direction(up, down).is_some(),
                    "no turn for {up} -> {down}"
                );
            }
        }
    }

    #[test]
    fn known_maneuvers() {
        use CompassDirection::*;
        // westbound approach (from East) continuing west passes a piece
        // that also comes from the East side inverted to West
        assert_eq!(moving_direction(East, East), Some(Turn::Through));
        assert_eq!(moving_direction(East, South), Some(Turn::Left));
        assert_eq!(moving_direction(East, North), Some(Turn::Right));
        assert_eq!(moving_direction(East, West), Some(Turn::UTurn));
    }

    #[test]
    fn index_lookup_matches_table() {
        for entry in MOVEMENT_TABLE {
            assert_eq!(movement_index(entry.from, entry.turn), Some(entry.index));
            assert_eq!(Turn::from_movement_index(entry.index), entry.turn);
        }
    }

    #[test]
    fn turn_wire_chars() {
        assert_eq!(Turn::Left.as_char(), 'l');
        assert_eq!(Turn::from_char('s'), Some(Turn::Through));
        assert_eq!(Turn::from_char('b'), Some(Turn::UTurn));
        assert_eq!(Turn::from_char('x'), None);
    }
}

#[cfg(test)]
mod polyline {
    use crate::{GeoPoint, Polyline, ShiftSide};

    fn line(coords: &[(f64, f64)]) -> Polyline {
        Polyline::new(coords.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect())
    }

    #[test]
    fn length_of_two_leg_line() {
        let pl = line(&[(45.5, -73.5), (45.5, -73.49), (45.51, -73.49)]);
        let direct = pl.points()[0].distance_m(pl.points()[2]);
        assert!(pl.length_m() > direct);
    }

    #[test]
    fn string_roundtrip_is_exact() {
        let pl = line(&[(45.508031, -73.5612), (45.50814159, -73.56009)]);
        let s = pl.to_string();
        let back: Polyline = s.parse().unwrap();
        assert_eq!(back, pl);
        assert_eq!(back.to_string(), s);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("12.0".parse::<Polyline>().is_err());
        assert!("a b;c d".parse::<Polyline>().is_err());
    }

    #[test]
    fn heading_info_forward_is_last_leg() {
        // eastward then northward: forward heading follows the final leg
        let pl = line(&[(45.5, -73.5), (45.5, -73.49), (45.51, -73.49)]);
        let info = pl.heading_info().unwrap();
        assert!((info.forward - 90.0).abs() < 1.0);
        assert!((info.backward.abs() - 180.0).abs() < 1.0);
        assert!(info.weighted_forward > info.weighted_backward.abs() - 180.0);
    }

    #[test]
    fn degenerate_has_no_heading() {
        assert!(line(&[(45.5, -73.5)]).heading_info().is_none());
        assert!(Polyline::default().heading_info().is_none());
    }

    #[test]
    fn append_skips_shared_joint() {
        let mut a = line(&[(45.5, -73.5), (45.5, -73.49)]);
        let b = line(&[(45.5, -73.49), (45.5, -73.48)]);
        a.append(&b, true);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn shift_moves_points_sideways() {
        // eastbound line shifted right should move south
        let pl = line(&[(45.5, -73.5), (45.5, -73.49)]);
        let shifted = pl.shifted(ShiftSide::Right, 9.0);
        assert_eq!(shifted.len(), pl.len());
        for (p, q) in pl.points().iter().zip(shifted.points()) {
            assert!(q.lat < p.lat);
            assert!((p.distance_m(*q) - 9.0).abs() < 0.1);
        }
        let left = pl.shifted(ShiftSide::Left, 9.0);
        assert!(left.points()[0].lat > pl.points()[0].lat);
    }

    #[test]
    fn split_even_preserves_ends_and_length() {
        let pl = line(&[(45.5, -73.5), (45.5, -73.48), (45.51, -73.47)]);
        let pieces = pl.split_even(4);
        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces[0].first(), pl.first());
        let last = pieces.last().unwrap().last().unwrap();
        assert!(last.distance_m(pl.last().unwrap()) < 0.5);
        // adjacent pieces share their joint
        for w in pieces.windows(2) {
            assert_eq!(w[0].last(), w[1].first());
        }
        let total: f64 = pieces.iter().map(|p| p.length_m()).sum();
        assert!((total - pl.length_m()).abs() < 1.0);
        // roughly equal arc lengths
        let unit = pl.length_m() / 4.0;
        for p in &pieces {
            assert!((p.length_m() - unit).abs() < unit * 0.05, "piece {}", p.length_m());
        }
    }

    #[test]
    fn bounding_box() {
        let pl = line(&[(45.5, -73.5), (45.52, -73.48), (45.51, -73.51)]);
        let bb = pl.bounding_box().unwrap();
        assert_eq!(bb.min_lat, 45.5);
        assert_eq!(bb.max_lat, 45.52);
        assert_eq!(bb.min_lon, -73.51);
        assert_eq!(bb.max_lon, -73.48);
        assert!(bb.contains(GeoPoint::new(45.51, -73.5)));
        assert!(!bb.contains(GeoPoint::new(45.49, -73.5)));
    }
}
