mod gate_error_tests;
