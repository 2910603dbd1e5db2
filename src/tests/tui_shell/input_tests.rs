use super::*;

fn input(s: &str) -> Input {
    let mut i = Input::default();
    for c in s.chars() {
        i.insert_char(c);
    }
    i
}

#[test]
fn cursor_counts_chars_not_bytes() {
    let mut i = input("héllo");
    assert_eq!(i.cursor, 5);
    i.move_left();
    i.move_left();
    i.move_left();
    i.backspace();
    assert_eq!(i.buf, "hllo");
    assert_eq!(i.cursor, 1);
}

#[test]
fn delete_and_insert_at_cursor() {
    let mut i = input("abc");
    i.home();
    i.delete();
    assert_eq!(i.buf, "bc");
    i.insert_char('x');
    assert_eq!(i.buf, "xbc");
    i.end();
    i.delete();
    assert_eq!(i.buf, "xbc");
    i.move_right();
    assert_eq!(i.cursor, 3);
}

#[test]
fn backspace_at_start_is_a_no_op() {
    let mut i = input("a");
    i.home();
    i.backspace();
    assert_eq!(i.buf, "a");
    i.clear();
    assert_eq!((i.buf.as_str(), i.cursor), ("", 0));
}
