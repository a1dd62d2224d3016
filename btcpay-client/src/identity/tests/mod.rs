mod proptest_identity;
