mod claims_tests;
