//! In-place mutators: push, pop, shift, unshift, splice, reverse, fill, copyWithin

mod common;
use common::*;
use quicksilver_arrays::prelude::*;

fn strings(values: &[&str]) -> Value {
    Value::new_array(values.iter().map(|s| Value::from(*s)).collect())
}

fn string_slots(values: &[&str]) -> Vec<Option<Value>> {
    values.iter().map(|s| Some(Value::from(*s))).collect()
}

mod push_pop {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_then_pop_restores_dense() {
        for (label, engine) in engines() {
            let arr = numbers(&[1.0, 2.0, 3.0]);
            let pushed = call(&engine, "push", &arr, &[num(4.0), num(5.0), num(6.0)]);
            assert_eq!(pushed, num(6.0), "{}", label);
            for expected in [6.0, 5.0, 4.0] {
                assert_eq!(call(&engine, "pop", &arr, &[]), num(expected), "{}", label);
            }
            assert_eq!(elements(&arr), number_slots(&[1.0, 2.0, 3.0]), "{}", label);
        }
    }

    #[test]
    fn test_push_then_pop_restores_array_like() {
        let engine = engine();
        let object = array_like(2, &[(0, Value::from("a")), (1, Value::from("b"))]);
        assert_eq!(call(&engine, "push", &object, &[Value::from("c")]), num(3.0));
        assert_eq!(obj(&object).get_named("length").unwrap(), num(3.0));
        assert_eq!(call(&engine, "pop", &object, &[]), Value::from("c"));
        assert_eq!(obj(&object).get_length().unwrap(), 2);
        assert!(!obj(&object).has_property(2).unwrap());
        assert_eq!(obj(&object).get_by_index(1).unwrap(), Value::from("b"));
    }

    #[test]
    fn test_push_then_pop_restores_sparse() {
        let engine = engine();
        let arr = Value::new_sparse_array(1000, vec![(3, num(3.0)), (999, num(999.0))]);
        call(&engine, "push", &arr, &[num(1.0), num(2.0)]);
        assert_eq!(obj(&arr).get_length().unwrap(), 1002);
        call(&engine, "pop", &arr, &[]);
        call(&engine, "pop", &arr, &[]);
        assert_eq!(obj(&arr).get_length().unwrap(), 1000);
        assert_eq!(obj(&arr).get_by_index(999).unwrap(), num(999.0));
        assert_eq!(obj(&arr).find_by_index(1000).unwrap(), None);
    }

    #[test]
    fn test_pop_on_empty_array_like_sets_length() {
        let engine = engine();
        let object = Value::new_object();
        assert_eq!(call(&engine, "pop", &object, &[]), Value::Undefined);
        assert_eq!(obj(&object).get_named("length").unwrap(), num(0.0));
    }

    #[test]
    fn test_push_past_max_length_is_range_error() {
        let engine = engine();
        let object = array_like(u32::MAX, &[]);
        let err = engine.call("push", &object, &[Value::Null]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::RangeError));
        assert!(!obj(&object).has_property(u32::MAX - 1).unwrap());

        let object = array_like(u32::MAX - 1, &[]);
        assert_eq!(call(&engine, "push", &object, &[Value::Null]), num(u32::MAX as f64));
    }

    #[test]
    fn test_push_on_non_extensible_array_fails() {
        for (label, engine) in engines() {
            let arr = numbers(&[1.0]);
            freeze_shape(&arr);
            let err = engine.call("push", &arr, &[num(2.0)]).unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::TypeError), "{}", label);
            assert_eq!(elements(&arr), number_slots(&[1.0]), "{}", label);

            assert_eq!(call(&engine, "pop", &arr, &[]), num(1.0), "{}", label);
            assert_eq!(elements(&arr), vec![], "{}", label);
        }
    }
}

mod shift_unshift {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shift_array_like_moves_holes() {
        let engine = engine();
        let object = array_like(3, &[(0, Value::from("a")), (2, Value::from("c"))]);
        assert_eq!(call(&engine, "shift", &object, &[]), Value::from("a"));
        let o = obj(&object);
        assert_eq!(o.get_length().unwrap(), 2);
        assert!(!o.has_property(0).unwrap());
        assert_eq!(o.get_by_index(1).unwrap(), Value::from("c"));
        assert!(!o.has_property(2).unwrap());
    }

    #[test]
    fn test_unshift_keeps_holes_in_place() {
        for (label, engine) in engines() {
            let arr = Value::new_array_with_holes(vec![Some(num(1.0)), None, Some(num(3.0))]);
            assert_eq!(call(&engine, "unshift", &arr, &[num(0.0)]), num(4.0), "{}", label);
            assert_eq!(
                elements(&arr),
                vec![Some(num(0.0)), Some(num(1.0)), None, Some(num(3.0))],
                "{}",
                label
            );
        }
    }

    #[test]
    fn test_unshift_without_items_only_sets_length() {
        let engine = engine();
        let object = array_like(2, &[]);
        assert_eq!(call(&engine, "unshift", &object, &[]), num(2.0));
    }

    #[test]
    fn test_unshift_past_max_length_is_range_error() {
        let engine = engine();
        let object = array_like(u32::MAX, &[]);
        let err = engine.call("unshift", &object, &[num(1.0)]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::RangeError));
    }
}

mod splice {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_splice_replaces_middle() {
        for (label, engine) in engines() {
            let arr = strings(&["a", "b", "c", "d"]);
            let removed = call(
                &engine,
                "splice",
                &arr,
                &[num(1.0), num(2.0), Value::from("x"), Value::from("y")],
            );
            assert_eq!(elements(&removed), string_slots(&["b", "c"]), "{}", label);
            assert_eq!(elements(&arr), string_slots(&["a", "x", "y", "d"]), "{}", label);
        }
    }

    #[test]
    fn test_splice_without_arguments_is_noop() {
        for (label, engine) in engines() {
            let arr = strings(&["a", "b"]);
            let removed = call(&engine, "splice", &arr, &[]);
            assert_eq!(elements(&removed), vec![], "{}", label);
            assert_eq!(elements(&arr), string_slots(&["a", "b"]), "{}", label);
        }
    }

    #[test]
    fn test_splice_array_like() {
        let engine = engine();
        let object = array_like(
            4,
            &[(0, Value::from("a")), (1, Value::from("b")), (3, Value::from("d"))],
        );
        let removed = call(&engine, "splice", &object, &[num(0.0), num(1.0)]);
        assert_eq!(elements(&removed), string_slots(&["a"]));

        let o = obj(&object);
        assert_eq!(o.get_length().unwrap(), 3);
        assert_eq!(o.get_by_index(0).unwrap(), Value::from("b"));
        assert!(!o.has_property(1).unwrap());
        assert_eq!(o.get_by_index(2).unwrap(), Value::from("d"));
        assert!(!o.has_property(3).unwrap());
    }

    #[test]
    fn test_splice_negative_start_and_huge_count() {
        for (label, engine) in engines() {
            let arr = numbers(&[1.0, 2.0, 3.0, 4.0]);
            let removed = call(&engine, "splice", &arr, &[num(-2.0), num(1e10)]);
            assert_eq!(elements(&removed), number_slots(&[3.0, 4.0]), "{}", label);
            assert_eq!(elements(&arr), number_slots(&[1.0, 2.0]), "{}", label);
        }
    }
}

mod reverse {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reverse_is_its_own_inverse() {
        for (label, engine) in engines() {
            let original = vec![
                Some(num(1.0)),
                None,
                Some(Value::Undefined),
                None,
                Some(num(5.0)),
                Some(num(6.0)),
            ];
            let arr = Value::new_array_with_holes(original.clone());
            call(&engine, "reverse", &arr, &[]);
            assert_eq!(
                elements(&arr),
                vec![
                    Some(num(6.0)),
                    Some(num(5.0)),
                    None,
                    Some(Value::Undefined),
                    None,
                    Some(num(1.0)),
                ],
                "{}",
                label
            );
            call(&engine, "reverse", &arr, &[]);
            assert_eq!(elements(&arr), original, "{}", label);
        }
    }

    #[test]
    fn test_reverse_sparse() {
        let engine = engine();
        let arr = Value::new_sparse_array(
            100,
            vec![(0, Value::from("first")), (98, Value::from("near end"))],
        );
        call(&engine, "reverse", &arr, &[]);
        let o = obj(&arr);
        assert_eq!(o.get_by_index(99).unwrap(), Value::from("first"));
        assert_eq!(o.get_by_index(1).unwrap(), Value::from("near end"));
        assert!(!o.has_property(0).unwrap());
        assert!(!o.has_property(98).unwrap());
        assert_eq!(o.get_length().unwrap(), 100);
    }

    #[test]
    fn test_reverse_returns_this() {
        let engine = engine();
        let arr = numbers(&[1.0, 2.0]);
        assert_eq!(call(&engine, "reverse", &arr, &[]), arr);
    }
}

mod fill_copy_within {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_copy_within_forward_overlap() {
        for (label, engine) in engines() {
            let arr = numbers(&[1.0, 2.0, 3.0, 4.0, 5.0]);
            call(&engine, "copyWithin", &arr, &[num(0.0), num(3.0)]);
            assert_eq!(elements(&arr), number_slots(&[4.0, 5.0, 3.0, 4.0, 5.0]), "{}", label);
        }
    }

    #[test]
    fn test_copy_within_backward_overlap() {
        for (label, engine) in engines() {
            let arr = numbers(&[1.0, 2.0, 3.0, 4.0, 5.0]);
            call(&engine, "copyWithin", &arr, &[num(2.0), num(0.0), num(4.0)]);
            assert_eq!(elements(&arr), number_slots(&[1.0, 2.0, 1.0, 2.0, 3.0]), "{}", label);
        }
    }

    #[test]
    fn test_fill_overwrites_holes() {
        for (label, engine) in engines() {
            let arr = Value::new_array_with_holes(vec![None, Some(num(1.0)), None]);
            call(&engine, "fill", &arr, &[Value::from("z")]);
            assert_eq!(elements(&arr), string_slots(&["z", "z", "z"]), "{}", label);
        }
    }

    #[test]
    fn test_fill_array_like_and_non_extensible() {
        let engine = engine();
        let object = array_like(2, &[]);
        call(&engine, "fill", &object, &[num(7.0)]);
        assert_eq!(obj(&object).get_by_index(1).unwrap(), num(7.0));

        let arr = numbers(&[1.0, 2.0]);
        freeze_shape(&arr);
        call(&engine, "fill", &arr, &[num(0.0), num(1.0)]);
        assert_eq!(elements(&arr), number_slots(&[1.0, 0.0]));
    }
}
