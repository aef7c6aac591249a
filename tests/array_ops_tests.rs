//! Integration tests for the array operations: chunking, compaction,
//! concatenation, the difference family, the drop family, fill, and
//! find_index.

mod common;
use common::{floats, nums, obj, strs};
use lodestone::seq::{self, Iteratee, Predicate};
use lodestone::{partition, Value};
use pretty_assertions::assert_eq;

mod chunk {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_into_even_groups_with_remainder_last() {
        let data = strs(&["a", "b", "c", "d"]);
        assert_eq!(
            partition::chunk(&data, 2),
            Value::array(vec![strs(&["a", "b"]), strs(&["c", "d"])])
        );
        assert_eq!(
            partition::chunk(&data, 3),
            Value::array(vec![strs(&["a", "b", "c"]), strs(&["d"])])
        );
    }

    #[test]
    fn chunks_a_string_into_character_groups() {
        let chunks = partition::chunk(&Value::from("hello world"), 3);
        assert_eq!(
            chunks,
            Value::array(vec![
                strs(&["h", "e", "l"]),
                strs(&["l", "o", " "]),
                strs(&["w", "o", "r"]),
                strs(&["l", "d"]),
            ])
        );
    }

    #[test]
    fn never_mutates_its_input() {
        let data = nums(&[1, 2, 3]);
        partition::chunk(&data, 2);
        assert_eq!(data, nums(&[1, 2, 3]));
    }
}

mod compact {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_every_falsy_value() {
        let data = Value::array(vec![
            Value::from(0),
            Value::from(1),
            Value::from(false),
            Value::from(2),
            Value::from(""),
            Value::from(3),
            Value::Null,
            Value::Undefined,
            Value::Number(f64::NAN),
        ]);
        assert_eq!(seq::compact(&data), nums(&[1, 2, 3]));
    }

    #[test]
    fn is_empty_for_non_sequences() {
        assert_eq!(seq::compact(&Value::Null), Value::array(vec![]));
        assert_eq!(seq::compact(&Value::from(7)), Value::array(vec![]));
    }
}

mod concat {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spreads_arrays_one_level_and_appends_scalars() {
        let array = nums(&[1]);
        let other = seq::concat(
            &array,
            &[
                Value::from(2),
                nums(&[3]),
                Value::array(vec![nums(&[4])]),
            ],
        );
        assert_eq!(
            other,
            Value::array(vec![
                Value::from(1),
                Value::from(2),
                Value::from(3),
                nums(&[4]),
            ])
        );
        // the input is untouched
        assert_eq!(array, nums(&[1]));
    }

    #[test]
    fn concat_of_nothing_clones() {
        let array = nums(&[1, 2]);
        let copy = seq::concat(&array, &[]);
        assert_eq!(copy, array);
        assert!(!copy.strict_equals(&array));
    }
}

mod difference {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_values_present_in_any_other_array() {
        assert_eq!(
            seq::difference(&nums(&[2, 1]), &[nums(&[2, 3])]),
            nums(&[1])
        );
        assert_eq!(
            seq::difference(&nums(&[1, 2, 3, 4]), &[nums(&[2]), nums(&[4])]),
            nums(&[1, 3])
        );
    }

    #[test]
    fn excluded_values_outside_the_input_are_harmless() {
        assert_eq!(
            seq::difference(&seq::range(0, 10), &[nums(&[7, 8, 3, 4, 5, 200])]),
            nums(&[0, 1, 2, 6, 9])
        );
    }

    #[test]
    fn ignores_non_array_exclusion_arguments() {
        assert_eq!(
            seq::difference(&nums(&[1, 2]), &[Value::from(1), Value::Null]),
            nums(&[1, 2])
        );
    }

    #[test]
    fn structurally_equal_objects_are_not_excluded() {
        // SameValueZero compares compounds by reference, so a fresh {x: 12}
        // never matches the {x: 12} in the input
        let data = Value::array(vec![
            obj(&[("x", Value::from(12))]),
            obj(&[("y", Value::from(14))]),
        ]);
        let excluded = Value::array(vec![obj(&[("x", Value::from(12))])]);
        let result = seq::difference(&data, &[excluded]);
        assert_eq!(seq::size(&result), 2);
    }

    #[test]
    fn difference_by_compares_mapped_keys() {
        let floor = Iteratee::func(|v: &Value| Value::from(v.to_number().floor()));
        assert_eq!(
            seq::difference_by(
                &floats(&[1.1, 2.2, 3.3, 4.4, 5.5]),
                &[floats(&[1.9, 2.9, 5.9])],
                &floor,
            ),
            floats(&[3.3, 4.4])
        );

        // one-decimal precision keeps 1.21 and 1.31 apart from 1.17
        let floor1 = Iteratee::func(|v: &Value| Value::from((v.to_number() * 10.0).floor() / 10.0));
        assert_eq!(
            seq::difference_by(
                &floats(&[1.11, 1.12, 1.13, 1.21, 1.31]),
                &[floats(&[1.17])],
                &floor1,
            ),
            floats(&[1.21, 1.31])
        );
    }

    #[test]
    fn difference_with_structural_comparator_excludes_equal_objects() {
        let data = Value::array(vec![
            obj(&[("x", Value::from(12))]),
            obj(&[("y", Value::from(14))]),
        ]);
        let excluded = Value::array(vec![obj(&[("x", Value::from(12))])]);
        let result = seq::difference_with(&data, &[excluded], Value::deep_equals);
        assert_eq!(result, Value::array(vec![obj(&[("y", Value::from(14))])]));
    }
}

mod drop {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_from_the_front() {
        let data = nums(&[1, 2, 3]);
        assert_eq!(seq::drop(&data, 1), nums(&[2, 3]));
        assert_eq!(seq::drop(&data, 2), nums(&[3]));
        assert_eq!(seq::drop(&data, 5), Value::array(vec![]));
        assert_eq!(seq::drop(&data, 0), data);
        assert_eq!(seq::drop(&data, -3), data);
    }

    #[test]
    fn drops_from_the_back() {
        let data = nums(&[1, 2, 3]);
        assert_eq!(seq::drop_right(&data, 1), nums(&[1, 2]));
        assert_eq!(seq::drop_right(&data, 5), Value::array(vec![]));
        assert_eq!(seq::drop_right(&data, 0), data);
    }

    #[test]
    fn drop_while_removes_the_matching_prefix_only() {
        let data = nums(&[1, 2, 3, 1]);
        let below_three = Predicate::func(|v: &Value| v.to_number() < 3.0);
        assert_eq!(seq::drop_while(&data, &below_three), nums(&[3, 1]));
        assert_eq!(seq::drop_right_while(&data, &below_three), nums(&[1, 2, 3]));

        // a never-failing predicate empties the sequence
        let always = Predicate::func(|_| true);
        assert_eq!(seq::drop_while(&data, &always), Value::array(vec![]));
    }
}

mod fill {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overwrites_the_whole_array_by_default() {
        let data = nums(&[1, 2, 3]);
        seq::fill(&data, &Value::from("a"), None, None);
        assert_eq!(data, strs(&["a", "a", "a"]));
    }

    #[test]
    fn respects_start_and_end_bounds() {
        let data = nums(&[4, 6, 8, 10]);
        seq::fill(&data, &Value::from("*"), Some(1), Some(3));
        assert_eq!(
            data,
            Value::array(vec![
                Value::from(4),
                Value::from("*"),
                Value::from("*"),
                Value::from(10),
            ])
        );
    }

    #[test]
    fn is_idempotent() {
        let data = nums(&[1, 2, 3, 4]);
        seq::fill(&data, &Value::from(0), Some(1), Some(3));
        let once = data.shallow_clone();
        seq::fill(&data, &Value::from(0), Some(1), Some(3));
        assert_eq!(data, once);
    }

    #[test]
    fn inverted_or_empty_ranges_change_nothing() {
        let data = nums(&[1, 2, 3]);
        seq::fill(&data, &Value::from(9), Some(2), Some(1));
        seq::fill(&data, &Value::from(9), Some(1), Some(1));
        assert_eq!(data, nums(&[1, 2, 3]));
    }

    #[test]
    fn leaves_strings_untouched() {
        let s = Value::from("abc");
        seq::fill(&s, &Value::from("x"), None, None);
        assert_eq!(s, Value::from("abc"));
    }
}

mod find_index {
    use super::*;
    use pretty_assertions::assert_eq;

    fn users() -> Value {
        Value::array(vec![
            obj(&[("user", Value::from("barney")), ("active", Value::from(false))]),
            obj(&[("user", Value::from("fred")), ("active", Value::from(false))]),
            obj(&[("user", Value::from("pebbles")), ("active", Value::from(true))]),
        ])
    }

    #[test]
    fn function_predicate() {
        let index = seq::find_index(
            &users(),
            &Predicate::func(|u: &Value| u.get("user") == Value::from("fred")),
        );
        assert_eq!(index, 1);
    }

    #[test]
    fn matches_predicate_is_structural() {
        let wanted = obj(&[("user", Value::from("pebbles")), ("active", Value::from(true))]);
        assert_eq!(seq::find_index(&users(), &Predicate::Matches(wanted)), 2);

        // a partial object is not a match: every property must agree
        let partial = obj(&[("user", Value::from("pebbles"))]);
        assert_eq!(seq::find_index(&users(), &Predicate::Matches(partial)), -1);
    }

    #[test]
    fn matches_on_a_raw_scalar_is_plain_equality() {
        // scalars have no properties to match; structural equality on a
        // number is just number equality
        let data = nums(&[5, 10, 15]);
        assert_eq!(seq::find_index(&data, &Predicate::matches(10)), 1);
        assert_eq!(seq::find_index(&data, &Predicate::matches(42)), -1);
    }

    #[test]
    fn property_shorthand_tests_truthiness() {
        assert_eq!(seq::find_index(&users(), &Predicate::property("active")), 2);

        // a property nobody has never matches
        assert_eq!(seq::find_index(&users(), &Predicate::property("admin")), -1);
    }

    #[test]
    fn missing_match_and_non_sequences_give_minus_one() {
        assert_eq!(
            seq::find_index(&Value::Null, &Predicate::func(|_| true)),
            -1
        );
        assert_eq!(
            seq::find_index(&Value::array(vec![]), &Predicate::func(|_| true)),
            -1
        );
    }
}
