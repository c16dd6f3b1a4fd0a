mod probing;
