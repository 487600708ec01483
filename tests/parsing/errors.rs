#[cfg(test)]
mod syntax {
    use stf::parsing::{Handlers, Options, ParsingError, Position, Reader};

    fn reader(content: &str) -> Reader {
        Reader::from_str("test.stf", content, Options::default())
    }

    /// Helper function to check that processing a whole input fails with
    /// an error of the expected kind.
    fn expect_error(content: &str, expected: ParsingError) {
        let result = reader(content).process_file(Handlers::new());
        match result {
            Ok(_) => panic!(
                "Expected parsing to fail, but it succeeded for input: {}",
                content
            ),
            Err(error) => {
                if std::mem::discriminant(&error.error) != std::mem::discriminant(&expected) {
                    panic!(
                        "Expected error type like {:?} but got: {:?} for input '{}'",
                        expected, error.error, content
                    );
                }
            }
        }
    }

    fn at(offset: usize, line: usize, column: usize) -> Position {
        Position {
            offset,
            line,
            column,
        }
    }

    #[test]
    fn malformed_number() {
        let mut count = 42.0;

        let mut input = reader("count(12x3)");
        let result = input.process_file(Handlers::new().on("count", |r| {
            count = r.read_number(0.0)?;
            Ok(())
        }));

        let error = result.unwrap_err();
        assert_eq!(
            error.error,
            ParsingError::MalformedNumber(at(6, 1, 7), "12x3".to_string())
        );
        assert_eq!(error.line, 1);
        assert_eq!(error.column, 7);
        assert_eq!(error.code, "count(12x3)");

        // output untouched
        assert_eq!(count, 42.0);
    }

    #[test]
    fn malformed_numbers_not_coerced() {
        for text in ["inf", "NaN", "1.2.3", "0x10", "--1", "\"\""] {
            let mut input = reader(&format!("( {} )", text));
            match input.read_number(0.0) {
                Err(ParsingError::MalformedNumber(_, _)) => {}
                other => panic!("Expected MalformedNumber for {} but got {:?}", text, other),
            }
        }

        let mut input = reader("( 2.5 )");
        match input.read_integer(0) {
            Err(ParsingError::MalformedNumber(_, text)) => assert_eq!(text, "2.5"),
            other => panic!("Expected MalformedNumber but got {:?}", other),
        }

        for text in ["+-5", "++5", "5t"] {
            let mut input = reader(&format!("( {} )", text));
            match input.read_integer(0) {
                Err(ParsingError::MalformedNumber(_, found)) => assert_eq!(found, text),
                other => panic!("Expected MalformedNumber for {} but got {:?}", text, other),
            }
        }

        let mut input = reader("( +7 )");
        assert_eq!(input.read_integer(0), Ok(7));

        let mut input = reader("( 1 two )");
        match input.read_numbers() {
            Err(ParsingError::MalformedNumber(_, text)) => assert_eq!(text, "two"),
            other => panic!("Expected MalformedNumber but got {:?}", other),
        }
    }

    #[test]
    fn unterminated_block() {
        let mut name = String::new();

        let mut input = reader(r#"engine( name("x")"#);
        let result = input.process_file(Handlers::new().on("engine", |r| {
            r.process_block(Handlers::new().on("name", |r| {
                name = r.read_string("")?;
                Ok(())
            }))
        }));

        let error = result.unwrap_err();
        assert_eq!(
            error.error,
            ParsingError::UnexpectedEndOfInput(at(17, 1, 18), Some(at(6, 1, 7)))
        );
        assert_eq!(error.problem, "expected closing ')' but found end of file");
    }

    #[test]
    fn unterminated_skipped_block() {
        expect_error(
            "unknown ( a ( b )",
            ParsingError::UnexpectedEndOfInput(at(0, 1, 1), None),
        );
    }

    #[test]
    fn unterminated_comment_block() {
        expect_error(
            "comment ( never closed",
            ParsingError::UnexpectedEndOfInput(at(0, 1, 1), None),
        );
    }

    #[test]
    fn unterminated_value_block() {
        let mut input = reader("( \"x\"");
        match input.read_string("") {
            Err(ParsingError::UnexpectedEndOfInput(_, Some(opened))) => assert_eq!(opened, at(0, 1, 1)),
            other => panic!("Expected UnexpectedEndOfInput but got {:?}", other),
        }
    }

    #[test]
    fn stray_closer() {
        let result = reader("a ( 1 ) )\nb ( 2 )").process_file(Handlers::new());
        let error = result.unwrap_err();
        assert_eq!(error.error, ParsingError::UnbalancedBlock(at(8, 1, 9)));
        assert_eq!(error.to_string(), "error: test.stf:1:9 unbalanced ')' with no matching '('");
    }

    #[test]
    fn unterminated_quote() {
        expect_error(
            "name ( \"Flying Scotsman )\n",
            ParsingError::UnterminatedQuotedString(at(0, 1, 1)),
        );
    }

    #[test]
    fn process_block_requires_open() {
        let mut input = reader("engine name");
        let result = input.process_file(Handlers::new().on("engine", |r| r.process_block(Handlers::new())));

        let error = result.unwrap_err();
        assert_eq!(
            error.error,
            ParsingError::Expected(at(7, 1, 8), "'('".to_string(), "'name'".to_string())
        );
        assert_eq!(error.problem, "expected '(' but found 'name'");
    }

    #[test]
    fn boolean_expected() {
        let mut input = reader("( maybe )");
        match input.read_bool(false) {
            Err(ParsingError::Expected(_, expected, found)) => {
                assert_eq!(expected, "true or false");
                assert_eq!(found, "'maybe'");
            }
            other => panic!("Expected Expected but got {:?}", other),
        }
    }

    #[test]
    fn errors_from_handlers_abort() {
        let mut later = false;

        let mut input = reader("first ( x ) second ( y )");
        let result = input.process_file(
            Handlers::new()
                .on("first", |r| {
                    let position = r
                        .peek_token()?
                        .position;
                    Err(ParsingError::Expected(position, "nothing".to_string(), "something".to_string()))
                })
                .on("second", |r| {
                    later = true;
                    r.skip_block()
                }),
        );

        assert!(result.is_err());
        assert!(!later);
    }

    #[test]
    fn error_on_later_line() {
        let content = "a ( 1 )\nb ( 2 )\n\n  count ( 1.5x )\n";
        let mut input = reader(content);
        let result = input.process_file(Handlers::new().on("count", |r| {
            r.read_number(0.0)?;
            Ok(())
        }));

        let error = result.unwrap_err();
        assert_eq!(error.line, 4);
        assert_eq!(error.column, 11);
        assert_eq!(error.code, "  count ( 1.5x )");
        assert!(error
            .full_details()
            .contains("test.stf:4:11"));
    }
}
