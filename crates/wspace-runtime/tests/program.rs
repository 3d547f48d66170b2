//! Program container tests: bulk assembly, disassembly, and text round trips

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use wspace_runtime::{FormatError, Instruction, Program};

fn reference_program() -> Program {
    Program::new(vec![
        Instruction::readi(),
        Instruction::push(123),
        Instruction::add(),
        Instruction::writei(),
        Instruction::exit(),
    ])
}

#[test]
fn binary_round_trip() {
    let program = reference_program();
    assert_eq!(Program::assemble(&program.disassemble()).unwrap(), program);
}

#[test]
fn text_round_trip() {
    let program = reference_program();
    assert_eq!(Program::from_text(&program.to_text()).unwrap(), program);
}

#[test]
fn to_text_renders_one_line_per_instruction_with_trailing_separator() {
    insta::assert_snapshot!(reference_program().to_text(), @r"
    readi
    push 123
    add
    writei
    exit
    ");
}

#[test]
fn assemble_ignores_bytes_outside_the_alphabet() {
    let plain = reference_program().disassemble();
    let mut annotated = String::from("#whitespace-source;");
    for ch in plain.chars() {
        annotated.push(ch);
        annotated.push('.');
    }
    assert_eq!(Program::assemble(&annotated).unwrap(), reference_program());
}

#[test]
fn assemble_propagates_the_first_decode_error() {
    // EXIT followed by a truncated prefix
    let err = Program::assemble("\n\n\n\t").unwrap_err();
    assert!(matches!(
        err,
        FormatError::AtOffset { offset: 3, source } if *source == FormatError::Truncated
    ));
}

#[test]
fn from_text_tolerates_exactly_one_trailing_empty_line() {
    let program = Program::from_text("push 1\nexit\n").unwrap();
    assert_eq!(
        program.instructions(),
        &[Instruction::push(1), Instruction::exit()]
    );
    // without the trailing separator
    assert_eq!(Program::from_text("push 1\nexit").unwrap(), program);
}

#[test]
fn from_text_rejects_a_blank_line_in_the_middle() {
    let err = Program::from_text("push 1\n\nexit\n").unwrap_err();
    assert!(matches!(err, FormatError::AtLine { line: 2, .. }));
}

#[test]
fn from_text_rejects_a_double_trailing_separator() {
    // only one trailing empty line is dropped; the second is a blank line
    assert!(Program::from_text("exit\n\n").is_err());
}

#[test]
fn empty_input_is_an_empty_program() {
    assert!(Program::assemble("").unwrap().is_empty());
    assert!(Program::from_text("").unwrap().is_empty());
    assert_eq!(Program::new(vec![]).to_text(), "");
}

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    let nullary = prop::sample::select(vec![
        Instruction::readch(),
        Instruction::readi(),
        Instruction::writech(),
        Instruction::writei(),
        Instruction::dup(),
        Instruction::swap(),
        Instruction::pop(),
        Instruction::add(),
        Instruction::sub(),
        Instruction::mul(),
        Instruction::div(),
        Instruction::modulo(),
        Instruction::ret(),
        Instruction::exit(),
        Instruction::store(),
        Instruction::load(),
    ]);
    prop_oneof![
        nullary,
        any::<i64>().prop_map(Instruction::push),
        any::<i64>().prop_map(Instruction::copy),
        any::<i64>().prop_map(Instruction::drop),
        (0i64..1_000_000).prop_map(Instruction::label),
        (0i64..1_000_000).prop_map(Instruction::call),
        (0i64..1_000_000).prop_map(Instruction::jmp),
        (0i64..1_000_000).prop_map(Instruction::jmpzero),
        (0i64..1_000_000).prop_map(Instruction::jmpneg),
    ]
}

proptest! {
    #[test]
    fn any_program_round_trips_both_codecs(
        instructions in proptest::collection::vec(arb_instruction(), 0..64)
    ) {
        let program = Program::new(instructions);
        prop_assert_eq!(
            &Program::assemble(&program.disassemble()).unwrap(),
            &program
        );
        prop_assert_eq!(&Program::from_text(&program.to_text()).unwrap(), &program);
    }
}
